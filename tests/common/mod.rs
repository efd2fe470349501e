//! Builds small XLSX and ODS packages in memory for tests and benchmarks.
#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const ODS_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// A workbook under construction.
#[derive(Debug, Clone, Default)]
pub struct XlsxFixture {
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
    styles: Option<String>,
    date1904: bool,
    omitted: Vec<String>,
}

impl XlsxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet from string rows.
    ///
    /// Numeric-looking values become number cells, other values inline
    /// strings, and empty strings are left out.
    pub fn sheet(mut self, name: &str, rows: &[&[&str]]) -> Self {
        let mut xml = String::new();
        for (r, row) in rows.iter().enumerate() {
            xml.push_str(&format!("<row r=\"{}\">", r + 1));
            for (c, value) in row.iter().enumerate() {
                let reference = format!("{}{}", column_letters(c), r + 1);
                if value.is_empty() {
                    continue;
                } else if is_numeric(value) {
                    xml.push_str(&format!("<c r=\"{reference}\"><v>{value}</v></c>"));
                } else {
                    xml.push_str(&format!(
                        "<c r=\"{reference}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                        escape(value)
                    ));
                }
            }
            xml.push_str("</row>");
        }
        self.sheets.push((name.to_string(), xml));
        self
    }

    /// Add a sheet whose `<sheetData>` content is given verbatim.
    pub fn raw_sheet(mut self, name: &str, sheet_data: &str) -> Self {
        self.sheets.push((name.to_string(), sheet_data.to_string()));
        self
    }

    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = strings.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn styles(mut self, xml: &str) -> Self {
        self.styles = Some(xml.to_string());
        self
    }

    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    /// Leave a part out of the package, e.g. `xl/worksheets/sheet2.xml`.
    pub fn omit(mut self, part: &str) -> Self {
        self.omitted.push(part.to_string());
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in self.parts() {
            if self.omitted.contains(&name) {
                continue;
            }
            zip.start_file(name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    pub fn write_to(&self, path: impl AsRef<Path>) {
        std::fs::write(path, self.to_bytes()).unwrap();
    }

    fn parts(&self) -> Vec<(String, String)> {
        let mut parts = Vec::new();
        let mut overrides = String::from(
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        );
        let mut sheet_entries = String::new();
        let mut workbook_rels = String::new();

        for (idx, (name, data)) in self.sheets.iter().enumerate() {
            let n = idx + 1;
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
            sheet_entries.push_str(&format!(
                r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
                escape(name)
            ));
            workbook_rels.push_str(&format!(
                r#"<Relationship Id="rId{n}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            ));
            parts.push((
                format!("xl/worksheets/sheet{n}.xml"),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheetData>{data}</sheetData></worksheet>"#
                ),
            ));
        }

        let next_id = self.sheets.len() + 1;
        if !self.shared_strings.is_empty() {
            let items: String = self
                .shared_strings
                .iter()
                .map(|s| format!("<si><t>{}</t></si>", escape(s)))
                .collect();
            overrides.push_str(
                r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
            );
            workbook_rels.push_str(&format!(
                r#"<Relationship Id="rId{next_id}" Type="{REL_NS}/sharedStrings" Target="sharedStrings.xml"/>"#
            ));
            parts.push((
                "xl/sharedStrings.xml".to_string(),
                format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="{MAIN_NS}" count="{0}" uniqueCount="{0}">{items}</sst>"#, self.shared_strings.len()),
            ));
        }

        if let Some(styles) = &self.styles {
            overrides.push_str(
                r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
            );
            workbook_rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="{REL_NS}/styles" Target="styles.xml"/>"#,
                next_id + 1
            ));
            parts.push(("xl/styles.xml".to_string(), styles.clone()));
        }

        let workbook_pr = if self.date1904 {
            r#"<workbookPr date1904="1"/>"#
        } else {
            "<workbookPr/>"
        };

        parts.push((
            "xl/workbook.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">{workbook_pr}<sheets>{sheet_entries}</sheets></workbook>"#
            ),
        ));
        parts.push((
            "xl/_rels/workbook.xml.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{PKG_REL_NS}">{workbook_rels}</Relationships>"#
            ),
        ));
        parts.push((
            "_rels/.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
            ),
        ));
        parts.insert(
            0,
            (
                "[Content_Types].xml".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{overrides}</Types>"#
                ),
            ),
        );

        parts
    }
}

/// Build an OpenDocument spreadsheet from string rows per sheet.
///
/// Numeric-looking values become float cells, empty strings empty cells.
pub fn ods_workbook(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
    let mut tables = String::new();
    for (name, rows) in sheets {
        tables.push_str(&format!(r#"<table:table table:name="{}">"#, escape(name)));
        for row in rows.iter() {
            tables.push_str("<table:table-row>");
            for value in row.iter() {
                if value.is_empty() {
                    tables.push_str("<table:table-cell/>");
                } else if is_numeric(value) {
                    tables.push_str(&format!(
                        r#"<table:table-cell office:value-type="float" office:value="{value}"><text:p>{value}</text:p></table:table-cell>"#
                    ));
                } else {
                    tables.push_str(&format!(
                        r#"<table:table-cell office:value-type="string"><text:p>{}</text:p></table:table-cell>"#,
                        escape(value)
                    ));
                }
            }
            tables.push_str("</table:table-row>");
        }
        tables.push_str("</table:table>");
    }

    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" office:version="1.2"><office:body><office:spreadsheet>{tables}</office:spreadsheet></office:body></office:document-content>"#
    );

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(ODS_MIMETYPE.as_bytes()).unwrap();
    zip.start_file("content.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(content.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Column letters for a zero-based index (0 -> A, 26 -> AA).
pub fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn is_numeric(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && value.chars().any(|c| c.is_ascii_digit())
        && value.parse::<f64>().is_ok()
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
