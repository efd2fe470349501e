//! CSV writer implementation.

use crate::error::{Error, Result};
use crate::model::{CellValue, Sheet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b',')
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .flexible(false);
    builder
}

/// Write a sheet as CSV to any writer.
///
/// A sheet without columns produces no output at all.
pub fn write_csv<W: Write>(sheet: &Sheet, writer: W) -> Result<()> {
    let mut csv = builder().from_writer(writer);

    if !sheet.is_empty() {
        csv.write_record(&sheet.header)?;
        for row in &sheet.rows {
            csv.write_record(row.iter().map(CellValue::to_field))?;
        }
    }

    csv.flush()?;
    Ok(())
}

/// Render a sheet as a CSV string.
pub fn to_csv_string(sheet: &Sheet) -> Result<String> {
    let mut out = Vec::new();
    write_csv(sheet, &mut out)?;
    String::from_utf8(out).map_err(|e| Error::Csv(e.to_string()))
}

/// Write a sheet to a CSV file, replacing any existing file.
///
/// The file handle is closed before this returns, on success and on error.
pub fn write_csv_file(sheet: &Sheet, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_csv(sheet, BufWriter::new(file))
}
