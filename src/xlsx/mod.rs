//! XLSX (Excel) workbook reader.
//!
//! Reads the sheet list from the workbook part and loads worksheets on
//! demand as [`Sheet`](crate::model::Sheet) grids.
//!
//! # Example
//!
//! ```no_run
//! use xlsx2csv::xlsx::XlsxWorkbook;
//!
//! let workbook = XlsxWorkbook::open("sales.xlsx")?;
//!
//! for name in workbook.sheet_names() {
//!     let sheet = workbook.read_sheet(name)?;
//!     println!("{}: {} rows", sheet.name, sheet.row_count());
//! }
//! # Ok::<(), xlsx2csv::Error>(())
//! ```

mod cell_ref;
mod parser;
mod shared_strings;
mod styles;

pub use parser::XlsxWorkbook;
pub(crate) use styles::format_serial_date;
