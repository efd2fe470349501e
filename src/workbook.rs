//! Format-independent workbook handle.

use crate::detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
use crate::error::Result;
use crate::model::Sheet;
use crate::spreadsheet::SpreadsheetWorkbook;
use crate::xlsx::XlsxWorkbook;
use std::path::Path;

/// An opened workbook of any supported format.
///
/// XLSX and XLSM packages go through the built-in OOXML reader; xls, xlsb
/// and ods go through [`SpreadsheetWorkbook`].
#[derive(Debug)]
pub enum Workbook {
    Xlsx(XlsxWorkbook),
    Spreadsheet(SpreadsheetWorkbook),
}

impl Workbook {
    /// Detect the format of a file and open it with the matching reader.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = detect_format_from_path(path)?;
        tracing::debug!(path = %path.display(), %format, "detected workbook format");

        match format {
            FormatType::Xlsx | FormatType::Xlsm => XlsxWorkbook::open(path).map(Workbook::Xlsx),
            FormatType::Xlsb | FormatType::Xls | FormatType::Ods => {
                SpreadsheetWorkbook::open(path, format).map(Workbook::Spreadsheet)
            }
        }
    }

    /// Detect the format of in-memory workbook bytes and open them.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let format = detect_format_from_bytes(&data)?;
        match format {
            FormatType::Xlsx | FormatType::Xlsm => XlsxWorkbook::from_bytes(data).map(Workbook::Xlsx),
            FormatType::Xlsb | FormatType::Xls | FormatType::Ods => {
                SpreadsheetWorkbook::from_bytes(data, format).map(Workbook::Spreadsheet)
            }
        }
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        match self {
            Workbook::Xlsx(wb) => wb.sheet_names(),
            Workbook::Spreadsheet(wb) => wb.sheet_names(),
        }
    }

    /// Number of sheets.
    pub fn sheet_count(&self) -> usize {
        match self {
            Workbook::Xlsx(wb) => wb.sheet_count(),
            Workbook::Spreadsheet(wb) => wb.sheet_count(),
        }
    }

    /// Load a sheet's full contents.
    pub fn read_sheet(&self, name: &str) -> Result<Sheet> {
        match self {
            Workbook::Xlsx(wb) => wb.read_sheet(name),
            Workbook::Spreadsheet(wb) => wb.read_sheet(name),
        }
    }
}
