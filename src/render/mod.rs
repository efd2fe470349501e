//! CSV rendering for sheets.
//!
//! Every field is quoted, the header row comes first, and no index column
//! is written.
//!
//! # Example
//!
//! ```no_run
//! use xlsx2csv::{open_workbook, render};
//!
//! let workbook = open_workbook("sales.xlsx")?;
//! let sheet = workbook.read_sheet("Q1")?;
//!
//! let csv = render::to_csv_string(&sheet)?;
//! render::write_csv_file(&sheet, "out/sales_Q1.csv")?;
//! # Ok::<(), xlsx2csv::Error>(())
//! ```

mod csv_writer;

pub use csv_writer::{to_csv_string, write_csv, write_csv_file};
