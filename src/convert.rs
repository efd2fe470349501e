//! Workbook to CSV conversion.
//!
//! One CSV file is written per sheet, named
//! `<output dir>/<input stem>_<sheet name>.csv`, in workbook order.

use crate::error::Result;
use crate::render::write_csv_file;
use std::path::{Path, PathBuf};

/// Base name of the input file with its extension removed.
///
/// Only the last extension is stripped, so `report.v2.xlsx` gives `report.v2`.
pub fn output_prefix(input: impl AsRef<Path>) -> String {
    input
        .as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Path of the CSV file produced for one sheet.
pub fn output_path(out_dir: impl AsRef<Path>, prefix: &str, sheet_name: &str) -> PathBuf {
    out_dir.as_ref().join(format!("{prefix}_{sheet_name}.csv"))
}

/// Convert every sheet of a workbook into its own CSV file.
///
/// Returns the written paths in sheet order. Existing files are overwritten.
/// On error, files already written for earlier sheets are left in place.
///
/// # Example
///
/// ```no_run
/// use xlsx2csv::convert::convert_workbook;
///
/// let outputs = convert_workbook("sales.xlsx", "out")?;
/// for path in &outputs {
///     println!("{}", path.display());
/// }
/// # Ok::<(), xlsx2csv::Error>(())
/// ```
pub fn convert_workbook(input: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    convert_workbook_with(input, out_dir, |_| {})
}

/// Like [`convert_workbook`], calling `on_sheet` with each sheet name before
/// that sheet is read.
pub fn convert_workbook_with<F>(
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    mut on_sheet: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&str),
{
    let input = input.as_ref();
    let out_dir = out_dir.as_ref();
    let prefix = output_prefix(input);

    let workbook = crate::open_workbook(input)?;
    let mut outputs = Vec::with_capacity(workbook.sheet_count());

    for name in workbook.sheet_names() {
        on_sheet(name);

        let sheet = workbook.read_sheet(name)?;
        let path = output_path(out_dir, &prefix, name);
        write_csv_file(&sheet, &path)?;

        tracing::debug!(
            sheet = name,
            columns = sheet.width(),
            rows = sheet.row_count(),
            path = %path.display(),
            "wrote sheet"
        );
        outputs.push(path);
    }

    tracing::info!(
        input = %input.display(),
        files = outputs.len(),
        "converted workbook"
    );
    Ok(outputs)
}
