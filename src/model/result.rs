//! Extraction outcome payload.

use serde::Serialize;

use super::SheetData;
use crate::error::Result;

/// Outcome of an extraction, serialized either as the sheet data record
/// or as `{ "error": <message> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    /// Rows were extracted
    Success(SheetData),
    /// Extraction failed; the message describes why
    Failure {
        /// Human-readable error message
        error: String,
    },
}

impl ExtractionResult {
    /// Build a failure payload from any displayable error.
    pub fn failure(error: impl std::fmt::Display) -> Self {
        ExtractionResult::Failure {
            error: error.to_string(),
        }
    }

    /// Whether rows were extracted.
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }

    /// The extracted data, if any.
    pub fn data(&self) -> Option<&SheetData> {
        match self {
            ExtractionResult::Success(data) => Some(data),
            ExtractionResult::Failure { .. } => None,
        }
    }

    /// The error message, if extraction failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ExtractionResult::Success(_) => None,
            ExtractionResult::Failure { error } => Some(error),
        }
    }
}

impl From<Result<SheetData>> for ExtractionResult {
    fn from(result: Result<SheetData>) -> Self {
        match result {
            Ok(data) => ExtractionResult::Success(data),
            Err(e) => ExtractionResult::failure(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::path::PathBuf;

    #[test]
    fn test_failure_json() {
        let result: ExtractionResult =
            Err(Error::FileNotFound(PathBuf::from("missing.xlsx"))).into();

        assert!(!result.is_success());
        assert_eq!(result.error(), Some("file not found: missing.xlsx"));
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"error":"file not found: missing.xlsx"}"#
        );
    }

    #[test]
    fn test_success_accessors() {
        let result = ExtractionResult::from(Ok(SheetData::default()));
        assert!(result.is_success());
        assert_eq!(result.data().map(SheetData::total_rows), Some(0));
        assert_eq!(result.error(), None);
    }
}
