//! SpreadsheetML part readers.
//!
//! This module parses the two XML parts of an unpacked workbook that row
//! extraction needs: the shared strings table and a single worksheet.
//!
//! # Example
//!
//! ```
//! use xmlsheet::xlsx::{SharedStrings, SheetReader};
//! use xmlsheet::ExtractOptions;
//!
//! let sst = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
//!     <si><t>Name</t></si>
//! </sst>"#;
//! let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
//!     <sheetData><row r="1"><c r="A1" t="s"><v>0</v></c></row></sheetData>
//! </worksheet>"#;
//!
//! let strings = SharedStrings::parse(sst)?;
//! let rows = SheetReader::new(&strings, &ExtractOptions::default()).read_rows(sheet)?;
//! assert_eq!(rows[0].get("A1"), Some("Name"));
//! # Ok::<(), xmlsheet::Error>(())
//! ```

mod shared_strings;
mod sheet;

pub use shared_strings::SharedStrings;
pub use sheet::SheetReader;

use quick_xml::events::BytesStart;
use quick_xml::name::{Namespace, ResolveResult};

/// Namespace URI of the SpreadsheetML main vocabulary.
pub const SPREADSHEETML_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Whether a resolved element namespace is the SpreadsheetML main namespace.
fn is_spreadsheetml(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == SPREADSHEETML_NS.as_bytes())
}

/// Validate a start tag: its prefix must be bound, and every attribute must
/// be unique and carry a valid value.
fn check_start(ns: &ResolveResult, e: &BytesStart) -> Result<(), String> {
    if let ResolveResult::Unknown(prefix) = ns {
        return Err(format!(
            "unbound prefix {:?}",
            String::from_utf8_lossy(prefix)
        ));
    }
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        attr.unescape_value().map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Checks shared by both readers that quick-xml leaves to the caller.
#[derive(Debug, Default)]
struct WellFormed {
    depth: usize,
    root_seen: bool,
}

impl WellFormed {
    /// Record an element start (`empty` for self-closing elements).
    fn open(&mut self, empty: bool) -> Result<(), String> {
        if self.depth == 0 {
            if self.root_seen {
                return Err("junk after document element".to_string());
            }
            self.root_seen = true;
        }
        if !empty {
            self.depth += 1;
        }
        Ok(())
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Reject character data outside the document element.
    fn text(&self, text: &[u8]) -> Result<(), String> {
        if self.depth == 0 && !text.iter().all(u8::is_ascii_whitespace) {
            return Err("text outside the document element".to_string());
        }
        Ok(())
    }

    fn finish(&self) -> Result<(), String> {
        if !self.root_seen {
            Err("no element found".to_string())
        } else if self.depth > 0 {
            Err(format!("unclosed element at end of input ({} open)", self.depth))
        } else {
            Ok(())
        }
    }
}
