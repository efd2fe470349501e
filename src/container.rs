//! ZIP container abstraction for an OOXML spreadsheet package.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Relationship type pointing from the package root to the workbook part.
pub const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Strict OOXML variant of [`OFFICE_DOCUMENT_REL`].
const STRICT_OFFICE_DOCUMENT_REL: &str =
    "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument";

/// A relationship entry from a .rels part.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part unless it starts with '/'
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

/// Relationships parsed from a single .rels part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
    by_type: HashMap<String, Vec<Relationship>>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a relationship by its ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// All relationships of a given type, in document order.
    pub fn get_by_type(&self, rel_type: &str) -> &[Relationship] {
        self.by_type
            .get(rel_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterate over every relationship, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn add(&mut self, rel: Relationship) {
        self.by_type
            .entry(rel.rel_type.clone())
            .or_default()
            .push(rel.clone());
        self.by_id.insert(rel.id.clone(), rel);
    }
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
///
/// Spreadsheets written by Excel are UTF-8, but some third-party producers
/// emit UTF-16 parts. After transcoding, the XML declaration is rewritten to
/// say UTF-8 so quick-xml does not try to decode the text a second time.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| Error::InvalidData(format!("invalid UTF-8 in XML part: {e}")));
    }

    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        return decode_utf16(rest, u16::from_le_bytes).map(|s| declare_utf8(&s));
    }

    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        return decode_utf16(rest, u16::from_be_bytes).map(|s| declare_utf8(&s));
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        // ASCII markup encoded as UTF-16 without a BOM leaves NULs in every other byte
        Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
            decode_utf16(bytes, u16::from_le_bytes).map(|s| declare_utf8(&s))
        }
        Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
            decode_utf16(bytes, u16::from_be_bytes).map(|s| declare_utf8(&s))
        }
        Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::InvalidData(format!("invalid UTF-16 in XML part: {e}")))
}

fn declare_utf8(content: &str) -> String {
    let Some(end) = content
        .starts_with("<?xml")
        .then(|| content.find("?>"))
        .flatten()
    else {
        return content.to_string();
    };

    let (decl, rest) = content.split_at(end + 2);
    let decl = ["\"UTF-16\"", "'UTF-16'", "\"utf-16\"", "'utf-16'"]
        .iter()
        .fold(decl.to_string(), |acc, enc| acc.replace(enc, "\"UTF-8\""));
    format!("{decl}{rest}")
}

/// An OOXML package held in memory as a ZIP archive.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xlsx2csv::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("sales.xlsx")?;
    /// assert!(container.exists("xl/workbook.xml"));
    /// # Ok::<(), xlsx2csv::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path.as_ref())?);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a package from its raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part as a string, transcoding UTF-16 parts if needed.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        decode_xml_bytes(&bytes)
    }

    /// Check whether a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// Read the relationships owned by `part_path` (`""` for the package root).
    ///
    /// A missing .rels part yields an empty collection.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let rels_path = match part_path.trim_start_matches('/') {
            "" => "_rels/.rels".to_string(),
            part => match part.rsplit_once('/') {
                Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
                None => format!("_rels/{part}.rels"),
            },
        };

        match self.read_xml(&rels_path) {
            Ok(xml) => parse_relationships(&xml),
            Err(Error::MissingComponent(_)) => Ok(Relationships::new()),
            Err(e) => Err(e),
        }
    }

    /// Locate the main workbook part through the package relationships.
    pub fn office_document_path(&self) -> Result<String> {
        let rels = self.read_package_relationships()?;
        let target = [OFFICE_DOCUMENT_REL, STRICT_OFFICE_DOCUMENT_REL]
            .iter()
            .find_map(|t| rels.get_by_type(t).first())
            .map(|rel| Self::resolve_path("", &rel.target));

        Ok(target.unwrap_or_else(|| "xl/workbook.xml".to_string()))
    }

    /// Read package-level relationships (`_rels/.rels`).
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        self.read_relationships("")
    }

    /// Resolve a relationship target against the part that owns it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(absolute) = relative.strip_prefix('/') {
            return absolute.to_string();
        }

        let mut segments: Vec<&str> = base.split('/').collect();
        // drop the owning part's file name
        segments.pop();
        for segment in relative.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
        segments.retain(|s| !s.is_empty());
        segments.join("/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.archive.borrow().len())
            .finish()
    }
}

fn parse_relationships(xml: &str) -> Result<Relationships> {
    let mut rels = Relationships::new();
    if xml.trim().is_empty() {
        return Ok(rels);
    }

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut rel = Relationship {
                    id: String::new(),
                    rel_type: String::new(),
                    target: String::new(),
                    external: false,
                };

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Id" => rel.id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        b"TargetMode" => rel.external = value.eq_ignore_ascii_case("external"),
                        _ => {}
                    }
                }

                if !rel.id.is_empty() {
                    rels.add(rel);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}
