//! XLSX workbook reader.

use crate::container::{OoxmlContainer, Relationships};
use crate::error::{Error, Result};
use crate::model::{CellValue, Sheet};
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

use super::cell_ref::{parse_cell_ref, parse_row_number, MAX_COLUMNS, MAX_ROWS};
use super::shared_strings::SharedStrings;
use super::styles::{format_serial_date, Styles};

/// Sheet entry from the workbook part.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    /// Resolved worksheet part, if the relationship could be followed
    part: Option<String>,
}

/// Pending cell while a `<c>` element is being read.
#[derive(Debug, Default)]
struct PendingCell {
    row: usize,
    col: usize,
    cell_type: Option<String>,
    style: Option<usize>,
    value: String,
}

/// An opened XLSX workbook.
///
/// Sheet names are read eagerly; sheet contents are loaded on demand by
/// [`read_sheet`](Self::read_sheet).
pub struct XlsxWorkbook {
    container: OoxmlContainer,
    shared_strings: SharedStrings,
    styles: Styles,
    sheets: Vec<SheetInfo>,
    date1904: bool,
}

impl XlsxWorkbook {
    /// Open an XLSX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Open a workbook from its raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        let workbook_path = container.office_document_path()?;
        let rels = container.read_relationships(&workbook_path)?;

        let xml = container.read_xml(&workbook_path)?;
        let (entries, date1904) = parse_workbook(&xml)?;

        let sheets: Vec<SheetInfo> = entries
            .into_iter()
            .map(|(name, rel_id)| {
                let part = rels
                    .get(&rel_id)
                    .filter(|rel| !rel.external)
                    .map(|rel| OoxmlContainer::resolve_path(&workbook_path, &rel.target));
                SheetInfo { name, part }
            })
            .collect();

        let shared_strings =
            match read_related_part(&container, &rels, &workbook_path, "/sharedStrings") {
                Some(xml) => SharedStrings::parse(&xml?)?,
                None => SharedStrings::default(),
            };

        let styles = match read_related_part(&container, &rels, &workbook_path, "/styles") {
            Some(xml) => Styles::parse(&xml?),
            None => Styles::default(),
        };

        tracing::debug!(
            workbook = %workbook_path,
            sheets = sheets.len(),
            shared_strings = shared_strings.len(),
            date1904,
            "opened workbook"
        );

        Ok(Self {
            container,
            shared_strings,
            styles,
            sheets,
            date1904,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Load a sheet's full contents.
    pub fn read_sheet(&self, name: &str) -> Result<Sheet> {
        let info = self
            .sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))?;

        let part = info
            .part
            .as_deref()
            .ok_or_else(|| Error::MissingComponent(format!("worksheet part for '{name}'")))?;

        let xml = self.container.read_xml(part)?;
        let grid = self.parse_worksheet(&xml)?;
        Ok(Sheet::from_grid(name, grid))
    }

    /// Parse worksheet XML into a cell grid anchored at A1.
    fn parse_worksheet(&self, xml: &str) -> Result<Vec<Vec<CellValue>>> {
        let mut grid: Vec<Vec<CellValue>> = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut next_row = 0usize;
        let mut current_row = 0usize;
        let mut next_col = 0usize;
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut phonetic_depth = 0usize;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        current_row = row_position(e, next_row)?;
                        next_col = 0;
                    }
                    b"c" => {
                        let pending = start_cell(e, current_row, next_col)?;
                        next_col = pending.col + 1;
                        cell = Some(pending);
                    }
                    b"v" if cell.is_some() => in_value = true,
                    b"rPh" if cell.is_some() => phonetic_depth += 1,
                    b"t" if cell.is_some() && phonetic_depth == 0 => in_value = true,
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        next_row = row_position(e, next_row)? + 1;
                    }
                    b"c" => {
                        // valueless cell, usually only carrying a style
                        next_col = start_cell(e, current_row, next_col)?.col + 1;
                    }
                    _ => {}
                },
                Ok(Event::Text(ref e)) if in_value => {
                    let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                    if let Some(pending) = cell.as_mut() {
                        pending.value.push_str(&text);
                    }
                }
                Ok(Event::CData(ref e)) if in_value => {
                    if let Some(pending) = cell.as_mut() {
                        pending.value.push_str(&String::from_utf8_lossy(e));
                    }
                }
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"row" => next_row = current_row + 1,
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            let value = self.resolve_cell_value(&pending);
                            place(&mut grid, pending.row, pending.col, value);
                        }
                        in_value = false;
                    }
                    b"v" | b"t" => in_value = false,
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(grid)
    }

    /// Resolve a raw cell value based on its type and style.
    fn resolve_cell_value(&self, cell: &PendingCell) -> CellValue {
        let raw = cell.value.as_str();

        match cell.cell_type.as_deref() {
            Some("inlineStr") | Some("str") => CellValue::text(raw),
            _ if raw.is_empty() => CellValue::Empty,
            Some("s") => match raw.trim().parse::<usize>() {
                Ok(idx) => match self.shared_strings.get(idx) {
                    Some(s) => CellValue::text(s),
                    None => {
                        tracing::debug!(index = idx, "shared string index out of range");
                        CellValue::Empty
                    }
                },
                Err(_) => CellValue::text(raw),
            },
            Some("b") => CellValue::Boolean(matches!(raw.trim(), "1" | "true" | "TRUE")),
            Some("e") => CellValue::text(raw),
            // ISO 8601 date cells
            Some("d") => CellValue::text(raw.replacen('T', " ", 1)),
            None | Some("n") => match raw.trim().parse::<f64>() {
                Ok(n) if cell.style.is_some_and(|s| self.styles.is_date_style(s)) => {
                    format_serial_date(n, self.date1904)
                        .map(CellValue::Text)
                        .unwrap_or(CellValue::Number(n))
                }
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::text(raw),
            },
            Some(other) => {
                tracing::debug!(cell_type = other, "unknown cell type, reading as text");
                CellValue::text(raw)
            }
        }
    }
}

impl std::fmt::Debug for XlsxWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxWorkbook")
            .field("sheets", &self.sheet_names())
            .field("date1904", &self.date1904)
            .finish()
    }
}

/// Read the part a workbook relationship of the given type suffix points to.
///
/// Matching on the suffix covers both transitional and strict namespaces.
fn read_related_part(
    container: &OoxmlContainer,
    rels: &Relationships,
    workbook_path: &str,
    type_suffix: &str,
) -> Option<Result<String>> {
    let rel = rels
        .iter()
        .find(|rel| !rel.external && rel.rel_type.ends_with(type_suffix))?;
    let part = OoxmlContainer::resolve_path(workbook_path, &rel.target);
    Some(container.read_xml(&part))
}

/// Parse the workbook part: sheet `(name, relationship id)` pairs and the date system.
fn parse_workbook(xml: &str) -> Result<(Vec<(String, String)>, bool)> {
    let mut sheets = Vec::new();
    let mut date1904 = false;
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"workbookPr" => {
                    date1904 = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == b"date1904")
                        .is_some_and(|a| matches!(a.value.as_ref(), b"1" | b"true"));
                }
                b"sheet" => {
                    let mut name = String::new();
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.local_name().as_ref() {
                            b"name" => {
                                name = attr
                                    .decode_and_unescape_value(reader.decoder())
                                    .map_err(|e| Error::XmlParse(e.to_string()))?
                                    .into_owned();
                            }
                            // r:id, whatever the prefix is bound to
                            b"id" if attr.key.prefix().is_some() => {
                                rel_id = String::from_utf8_lossy(&attr.value).into_owned();
                            }
                            _ => {}
                        }
                    }

                    if !name.is_empty() {
                        sheets.push((name, rel_id));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok((sheets, date1904))
}

/// Zero-based position of a `<row>` element, defaulting to the next row.
fn row_position(e: &BytesStart<'_>, next_row: usize) -> Result<usize> {
    match e.attributes().flatten().find(|a| a.key.as_ref() == b"r") {
        Some(attr) => {
            let value = String::from_utf8_lossy(&attr.value);
            parse_row_number(&value)
                .ok_or_else(|| Error::InvalidData(format!("invalid row number '{value}'")))
        }
        None if next_row < MAX_ROWS => Ok(next_row),
        None => Err(Error::InvalidData("too many rows".to_string())),
    }
}

/// Read the attributes of a `<c>` element.
fn start_cell(e: &BytesStart<'_>, row: usize, next_col: usize) -> Result<PendingCell> {
    let mut cell = PendingCell {
        row,
        col: next_col,
        ..Default::default()
    };

    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value);
        match attr.key.as_ref() {
            b"r" => {
                let (_, col) = parse_cell_ref(&value)
                    .ok_or_else(|| Error::InvalidData(format!("invalid cell reference '{value}'")))?;
                cell.col = col;
            }
            b"t" => cell.cell_type = Some(value.into_owned()),
            b"s" => cell.style = value.trim().parse().ok(),
            _ => {}
        }
    }

    if cell.col >= MAX_COLUMNS {
        return Err(Error::InvalidData("too many columns".to_string()));
    }
    Ok(cell)
}

fn place(grid: &mut Vec<Vec<CellValue>>, row: usize, col: usize, value: CellValue) {
    if value.is_empty() {
        return;
    }
    if grid.len() <= row {
        grid.resize_with(row + 1, Vec::new);
    }
    let cells = &mut grid[row];
    if cells.len() <= col {
        cells.resize(col + 1, CellValue::Empty);
    }
    cells[col] = value;
}
