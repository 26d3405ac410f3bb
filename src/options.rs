//! Extraction options configuration.

/// Default sheet index (the first worksheet).
pub const DEFAULT_SHEET_INDEX: u32 = 1;

/// Default inclusive row cap.
pub const DEFAULT_MAX_ROWS: u64 = 300;

/// Options for extracting rows from a worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// 1-based index selecting `sheet<N>.xml`
    pub sheet_index: u32,

    /// Highest row number to process. Reading stops at the first row
    /// numbered above it.
    pub max_rows: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            sheet_index: DEFAULT_SHEET_INDEX,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl ExtractOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the worksheet.
    pub fn with_sheet_index(mut self, sheet_index: u32) -> Self {
        self.sheet_index = sheet_index;
        self
    }

    /// Set the inclusive row cap.
    pub fn with_max_rows(mut self, max_rows: u64) -> Self {
        self.max_rows = max_rows;
        self
    }
}
