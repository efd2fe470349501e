//! Error types for the xlsx2csv library.

use std::io;
use thiserror::Error;

/// Result type alias for xlsx2csv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a workbook or writing CSV output.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format could not be determined.
    #[error("Unknown file format")]
    UnknownFormat,

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the workbook.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required workbook part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// A sheet name was requested that the workbook does not contain.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Error reported by the xls, xlsb or ods reader.
    #[error("Workbook read error: {0}")]
    Spreadsheet(String),

    /// Error while writing CSV output.
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::Spreadsheet(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}
