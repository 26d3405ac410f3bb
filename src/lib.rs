//! # xmlsheet
//!
//! Row extraction from spreadsheets that were already unpacked to XML.
//!
//! Given `book.xlsx`, the library reads `book_xml/sharedStrings.xml` and
//! `book_xml/sheet<N>.xml`, resolves shared string references and returns
//! the populated rows up to a row cap as a row → cell address → value table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use xmlsheet::render::{to_json, JsonFormat};
//!
//! // Every failure becomes an `{ "error": ... }` payload
//! let result = xmlsheet::extract("book.xlsx", 1, 300);
//! println!("{}", to_json(&result, JsonFormat::Pretty)?);
//!
//! // Typed errors instead of a payload
//! let options = xmlsheet::ExtractOptions::new().with_max_rows(50);
//! let data = xmlsheet::try_extract("book.xlsx", &options)?;
//! println!("Rows: {}", data.total_rows());
//! # Ok::<(), xmlsheet::Error>(())
//! ```

pub mod error;
pub mod model;
pub mod options;
pub mod package;
pub mod render;
pub mod xlsx;

// Re-exports
pub use error::{Error, Result};
pub use model::{ExtractionResult, SheetData, SheetRow};
pub use options::ExtractOptions;
pub use package::ExtractedPackage;

use std::path::Path;
use xlsx::{SharedStrings, SheetReader};

/// Extract rows from `sheet<sheet_index>.xml` of an unpacked spreadsheet.
///
/// Never fails: every error is reported inside the returned payload.
///
/// # Example
///
/// ```no_run
/// let result = xmlsheet::extract("book.xlsx", 1, 300);
/// if let Some(message) = result.error() {
///     eprintln!("{}", message);
/// }
/// ```
pub fn extract(source: impl AsRef<Path>, sheet_index: u32, max_rows: u64) -> ExtractionResult {
    let options = ExtractOptions::new()
        .with_sheet_index(sheet_index)
        .with_max_rows(max_rows);
    extract_with_options(source, &options)
}

/// Extract rows with options, reporting errors inside the payload.
pub fn extract_with_options(source: impl AsRef<Path>, options: &ExtractOptions) -> ExtractionResult {
    let result = try_extract(source, options);
    if let Err(ref e) = result {
        log::debug!("extraction failed: {}", e);
    }
    result.into()
}

/// Extract rows with options, returning typed errors.
///
/// Checks run in order: source file, `<stem>_xml` folder, shared strings
/// file and its parse, sheet file and its parse.
pub fn try_extract(source: impl AsRef<Path>, options: &ExtractOptions) -> Result<SheetData> {
    let source = source.as_ref();
    let package = ExtractedPackage::locate(source)?;

    let shared_strings = SharedStrings::parse(&package.read_shared_strings()?)?;

    let sheet_xml = package.read_sheet(options.sheet_index)?;
    let rows = SheetReader::new(&shared_strings, options).read_rows(&sheet_xml)?;

    Ok(SheetData {
        file: source.to_string_lossy().into_owned(),
        sheet_index: options.sheet_index,
        rows,
    })
}
