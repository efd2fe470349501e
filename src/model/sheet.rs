//! Sheet model: a header row plus rectangular data rows.

use super::CellValue;
use std::collections::HashMap;

/// One worksheet, with its first row promoted to column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Sheet name as stored in the workbook
    pub name: String,
    /// Column names taken from the first row
    pub header: Vec<String>,
    /// Data rows; every row is exactly `header.len()` cells wide
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a sheet from a raw cell grid anchored at A1.
    ///
    /// Trailing empty rows and columns are dropped, short rows are padded
    /// with [`CellValue::Empty`], and the first row becomes the header.
    /// Blank header cells are named `Unnamed: <index>` and repeated names
    /// get `.1`, `.2`, ... suffixes.
    pub fn from_grid(name: impl Into<String>, mut grid: Vec<Vec<CellValue>>) -> Self {
        let width = grid
            .iter()
            .filter_map(|row| row.iter().rposition(|c| !c.is_empty()))
            .max()
            .map_or(0, |last| last + 1);

        while grid
            .last()
            .is_some_and(|row| row.iter().all(CellValue::is_empty))
        {
            grid.pop();
        }

        let mut rows = grid.into_iter().map(|mut row| {
            row.resize(width, CellValue::Empty);
            row
        });

        let header = rows
            .next()
            .map(|first| normalize_header(&first))
            .unwrap_or_default();

        Self {
            name: name.into(),
            header,
            rows: rows.collect(),
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows (excluding the header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the sheet has no columns at all.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }
}

fn normalize_header(cells: &[CellValue]) -> Vec<String> {
    // next suffix to try per name, including names produced by renaming
    let mut counts: HashMap<String, usize> = HashMap::with_capacity(cells.len());
    let mut header = Vec::with_capacity(cells.len());

    for (idx, cell) in cells.iter().enumerate() {
        let mut name = if cell.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            cell.to_field()
        };

        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            name = format!("{name}.{count}");
            count = counts.get(&name).copied().unwrap_or(0);
        }

        counts.insert(name.clone(), count + 1);
        header.push(name);
    }

    header
}
