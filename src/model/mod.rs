//! In-memory model of a worksheet read from a workbook.
//!
//! The XLSX reader produces these structures, and the CSV renderer
//! consumes them. A [`Sheet`] is transient: it is read once, written out,
//! and dropped.

mod cell;
mod sheet;

pub use cell::*;
pub use sheet::*;
