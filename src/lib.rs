//! # xlsx2csv
//!
//! Split an Excel workbook into one quoted CSV file per sheet.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Convert every sheet of sales.xlsx into out/sales_<sheet>.csv
//! let outputs = xlsx2csv::convert_file("sales.xlsx", "out")?;
//! for path in &outputs {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), xlsx2csv::Error>(())
//! ```
//!
//! ## Reading Sheets Directly
//!
//! ```no_run
//! use xlsx2csv::{open_workbook, render};
//!
//! let workbook = open_workbook("sales.xlsx")?;
//! for name in workbook.sheet_names() {
//!     let sheet = workbook.read_sheet(name)?;
//!     print!("{}", render::to_csv_string(&sheet)?);
//! }
//! # Ok::<(), xlsx2csv::Error>(())
//! ```

pub mod container;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod render;
pub mod spreadsheet;
pub mod workbook;
pub mod xlsx;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod fixture;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use convert::{convert_workbook, convert_workbook_with, output_path, output_prefix};
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, Result};
pub use model::{CellValue, Sheet};
pub use spreadsheet::SpreadsheetWorkbook;
pub use workbook::Workbook;
pub use xlsx::XlsxWorkbook;

use std::path::{Path, PathBuf};

/// Open a workbook after checking its format.
///
/// XLSX and XLSM files are read by [`XlsxWorkbook`]; legacy `.xls`, binary
/// `.xlsb` and OpenDocument `.ods` files by [`SpreadsheetWorkbook`].
///
/// # Example
///
/// ```no_run
/// use xlsx2csv::open_workbook;
///
/// let workbook = open_workbook("sales.xlsx")?;
/// println!("Sheets: {:?}", workbook.sheet_names());
/// # Ok::<(), xlsx2csv::Error>(())
/// ```
pub fn open_workbook(path: impl AsRef<Path>) -> Result<Workbook> {
    Workbook::open(path)
}

/// Convert every sheet of a workbook into `<out_dir>/<stem>_<sheet>.csv`.
///
/// Shorthand for [`convert::convert_workbook`].
pub fn convert_file(input: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    convert::convert_workbook(input, out_dir)
}
