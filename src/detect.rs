//! Format detection for spreadsheet workbooks.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE2 compound document magic, used by legacy .xls workbooks.
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content type for a regular XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for an XLTX template workbook part.
const XLTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.template.main+xml";

/// Content type for a macro-enabled workbook part.
const XLSM_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

/// Content type for a binary workbook part.
const XLSB_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.binary.macroEnabled.main";

/// Mimetype entry of an OpenDocument spreadsheet.
const ODS_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// Supported workbook formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Excel workbook or template (.xlsx / .xltx)
    Xlsx,
    /// Macro-enabled Excel workbook (.xlsm)
    Xlsm,
    /// Binary Excel workbook (.xlsb)
    Xlsb,
    /// Legacy Excel 97-2003 workbook (.xls)
    Xls,
    /// OpenDocument spreadsheet (.ods)
    Ods,
}

impl FormatType {
    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "Excel Workbook",
            FormatType::Xlsm => "Excel Macro-Enabled Workbook",
            FormatType::Xlsb => "Excel Binary Workbook",
            FormatType::Xls => "Excel 97-2003 Workbook",
            FormatType::Ods => "OpenDocument Spreadsheet",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the workbook format of a file.
///
/// # Example
///
/// ```no_run
/// use xlsx2csv::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("sales.xlsx")?;
/// println!("Detected format: {}", format);
/// # Ok::<(), xlsx2csv::Error>(())
/// ```
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);

    let mut magic = [0u8; 8];
    let read = read_prefix(&mut reader, &mut magic)?;
    if is_ole_file(&magic[..read]) {
        return Ok(FormatType::Xls);
    }
    if !is_zip_file(&magic[..read]) {
        return Err(Error::UnknownFormat);
    }

    reader.rewind()?;
    detect_format_from_reader(reader)
}

/// Detect the workbook format from an in-memory file.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if is_ole_file(data) {
        return Ok(FormatType::Xls);
    }
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    detect_format_from_reader(std::io::Cursor::new(data))
}

/// Detect the workbook format of a ZIP package.
pub fn detect_format_from_reader<R: Read + Seek>(reader: R) -> Result<FormatType> {
    let mut archive = zip::ZipArchive::new(reader)?;

    if let Ok(mut file) = archive.by_name("mimetype") {
        let mut mimetype = String::new();
        file.read_to_string(&mut mimetype)?;
        if mimetype.trim() == ODS_MIMETYPE {
            return Ok(FormatType::Ods);
        }
    }

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => {
            return Err(Error::MissingComponent("[Content_Types].xml".to_string()));
        }
    };

    if content_types.contains(XLSM_CONTENT_TYPE) {
        Ok(FormatType::Xlsm)
    } else if content_types.contains(XLSX_CONTENT_TYPE) || content_types.contains(XLTX_CONTENT_TYPE)
    {
        Ok(FormatType::Xlsx)
    } else if content_types.contains(XLSB_CONTENT_TYPE) {
        Ok(FormatType::Xlsb)
    } else if archive.file_names().any(|n| n.starts_with("xl/")) {
        Ok(FormatType::Xlsx)
    } else {
        Err(Error::UnknownFormat)
    }
}

fn read_prefix(reader: &mut impl Read, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Check if data starts with the OLE2 compound document signature.
pub fn is_ole_file(data: &[u8]) -> bool {
    data.starts_with(&OLE_MAGIC)
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.starts_with(&ZIP_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn package(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn content_types(main: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Override PartName="/xl/workbook.xml" ContentType="{main}"/></Types>"#
        )
    }

    #[test]
    fn test_format_type_display() {
        assert_eq!(FormatType::Xlsx.to_string(), "Excel Workbook");
        assert_eq!(FormatType::Xlsm.to_string(), "Excel Macro-Enabled Workbook");
        assert_eq!(FormatType::Ods.to_string(), "OpenDocument Spreadsheet");
        assert_eq!(FormatType::Xls.to_string(), "Excel 97-2003 Workbook");
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B])); // Too short
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = detect_format_from_bytes(&[0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_legacy_xls() {
        let mut data = OLE_MAGIC.to_vec();
        data.extend_from_slice(&[0u8; 32]);
        assert!(is_ole_file(&data));
        assert_eq!(detect_format_from_bytes(&data).unwrap(), FormatType::Xls);
    }

    #[test]
    fn test_detect_xlsx_and_xlsm() {
        let xlsx = package(&[("[Content_Types].xml", &content_types(XLSX_CONTENT_TYPE))]);
        assert_eq!(detect_format_from_bytes(&xlsx).unwrap(), FormatType::Xlsx);

        let xltx = package(&[("[Content_Types].xml", &content_types(XLTX_CONTENT_TYPE))]);
        assert_eq!(detect_format_from_bytes(&xltx).unwrap(), FormatType::Xlsx);

        let xlsm = package(&[("[Content_Types].xml", &content_types(XLSM_CONTENT_TYPE))]);
        assert_eq!(detect_format_from_bytes(&xlsm).unwrap(), FormatType::Xlsm);
    }

    #[test]
    fn test_detect_xlsb_and_ods() {
        let xlsb = package(&[("[Content_Types].xml", &content_types(XLSB_CONTENT_TYPE))]);
        assert_eq!(detect_format_from_bytes(&xlsb).unwrap(), FormatType::Xlsb);

        let ods = package(&[("mimetype", ODS_MIMETYPE)]);
        assert_eq!(detect_format_from_bytes(&ods).unwrap(), FormatType::Ods);
    }

    #[test]
    fn test_detect_rejects_other_packages() {

        let docx = package(&[(
            "[Content_Types].xml",
            &content_types(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            ),
        )]);
        assert!(matches!(
            detect_format_from_bytes(&docx),
            Err(Error::UnknownFormat)
        ));

        let bare = package(&[("readme.txt", "hello")]);
        assert!(matches!(
            detect_format_from_bytes(&bare),
            Err(Error::MissingComponent(_))
        ));
    }
}
