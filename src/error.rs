//! Error types for the xmlsheet library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for xmlsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting rows from a worksheet.
#[derive(Error, Debug)]
pub enum Error {
    /// The source spreadsheet path does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The sibling `<stem>_xml` directory does not exist.
    #[error(
        "XML folder not found: {}\nextract the .xlsx archive into this folder first",
        .0.display()
    )]
    XmlFolderNotFound(PathBuf),

    /// `sharedStrings.xml` is missing from the XML folder.
    #[error("sharedStrings.xml not found: {}", .0.display())]
    SharedStringsNotFound(PathBuf),

    /// `sharedStrings.xml` is not well-formed.
    #[error("failed to parse sharedStrings.xml: {0}")]
    SharedStringsParse(String),

    /// The requested `sheet<N>.xml` is missing from the XML folder.
    #[error("sheet{sheet_index}.xml not found: {}", .path.display())]
    SheetNotFound { sheet_index: u32, path: PathBuf },

    /// The requested worksheet is not well-formed.
    #[error("failed to parse sheet{sheet_index}.xml: {message}")]
    SheetParse { sheet_index: u32, message: String },

    /// I/O error while reading an XML part.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error serializing the result.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means an input path was missing on disk.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::FileNotFound(_)
                | Error::XmlFolderNotFound(_)
                | Error::SharedStringsNotFound(_)
                | Error::SheetNotFound { .. }
        )
    }

    /// Whether this error means an XML document was malformed.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::SharedStringsParse(_) | Error::SheetParse { .. })
    }
}
