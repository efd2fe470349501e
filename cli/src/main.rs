//! xlsx2csv CLI - split an Excel workbook into per-sheet CSV files.
//!
//! ```text
//! xlsx2csv <INPUT> <OUTPUT_DIR>
//! ```

mod app;
mod args;
mod logging;

#[cfg(test)]
#[path = "../../tests/common/mod.rs"]
mod fixture;

use std::process::ExitCode;

fn main() -> ExitCode {
    app::run(std::env::args_os()).into()
}
