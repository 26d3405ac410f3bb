//! Output model for row extraction.
//!
//! Parsers fill [`SheetData`] with populated rows; [`ExtractionResult`] is
//! the payload handed to renderers, carrying either the data or an error
//! message.

mod result;
mod sheet;

pub use result::*;
pub use sheet::*;
