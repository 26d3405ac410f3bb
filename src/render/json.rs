//! JSON renderer implementation.

use crate::error::Result;
use crate::model::ExtractionResult;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert an extraction result to JSON.
///
/// Non-ASCII text is written as-is, never as `\u` escapes.
pub fn to_json(result: &ExtractionResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(result)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(result)?,
    };
    Ok(json)
}

/// Convert an extraction result to JSON with default formatting.
pub fn to_json_default(result: &ExtractionResult) -> Result<String> {
    to_json(result, JsonFormat::Pretty)
}
