//! Reader for xls, xlsb and ods workbooks.
//!
//! These formats are decoded with `calamine` and mapped onto the same
//! [`Sheet`] model the XLSX reader produces.

use crate::detect::FormatType;
use crate::error::{Error, Result};
use crate::model::{CellValue, Sheet};
use crate::xlsx::format_serial_date;
use calamine::{Data, Ods, Range, Reader, Sheets, Xls, Xlsb, Xlsx};
use std::cell::RefCell;
use std::io::Cursor;
use std::path::Path;

type Source = Cursor<Vec<u8>>;

/// An opened workbook in a non-OOXML (or binary OOXML) format.
///
/// Sheet names are read when the workbook is opened; sheet contents are
/// decoded on demand.
pub struct SpreadsheetWorkbook {
    sheets: RefCell<Sheets<Source>>,
    names: Vec<String>,
    format: FormatType,
}

impl SpreadsheetWorkbook {
    /// Open a workbook file of a known format.
    pub fn open(path: impl AsRef<Path>, format: FormatType) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(data, format)
    }

    /// Open a workbook of a known format from its raw bytes.
    pub fn from_bytes(data: Vec<u8>, format: FormatType) -> Result<Self> {
        let source = Cursor::new(data);
        let sheets = match format {
            FormatType::Xls => Sheets::Xls(Xls::new(source).map_err(calamine::Error::from)?),
            FormatType::Xlsb => Sheets::Xlsb(Xlsb::new(source).map_err(calamine::Error::from)?),
            FormatType::Ods => Sheets::Ods(Ods::new(source).map_err(calamine::Error::from)?),
            FormatType::Xlsx | FormatType::Xlsm => {
                Sheets::Xlsx(Xlsx::new(source).map_err(calamine::Error::from)?)
            }
        };
        let names = sheets.sheet_names();

        tracing::debug!(%format, sheets = names.len(), "opened workbook");

        Ok(Self {
            sheets: RefCell::new(sheets),
            names,
            format,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    /// Number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.names.len()
    }

    /// Load a sheet's full contents.
    pub fn read_sheet(&self, name: &str) -> Result<Sheet> {
        if !self.names.iter().any(|n| n == name) {
            return Err(Error::SheetNotFound(name.to_string()));
        }

        let range = self.sheets.borrow_mut().worksheet_range(name)?;
        Ok(Sheet::from_grid(name, range_to_grid(&range)))
    }
}

impl std::fmt::Debug for SpreadsheetWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpreadsheetWorkbook")
            .field("format", &self.format)
            .field("sheets", &self.names)
            .finish()
    }
}

/// Lay a range out as a grid anchored at A1.
fn range_to_grid(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut grid: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(cell_value));
        grid.push(cells);
    }
    grid
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::text(e.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            format_serial_date(serial, false)
                .map(CellValue::Text)
                .unwrap_or(CellValue::Number(serial))
        }
        Data::DateTimeIso(s) => CellValue::text(s.replacen('T', " ", 1)),
        Data::DurationIso(s) => CellValue::text(s.as_str()),
    }
}
