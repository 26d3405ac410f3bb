//! XLSX shared strings parsing.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::reader::NsReader;

use super::{check_start, is_spreadsheetml, WellFormed};

/// Shared strings table.
///
/// Entries are the texts of `<t>` elements that are direct children of an
/// `<si>` item, in document order. An item with no direct `<t>` adds no
/// entry, so every later index shifts down by one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse shared strings from XML content.
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_inner(xml).map_err(Error::SharedStringsParse)
    }

    fn parse_inner(xml: &str) -> std::result::Result<Self, String> {
        let mut strings = Vec::new();
        let mut reader = NsReader::from_str(xml);
        let mut check = WellFormed::default();

        let mut buf = Vec::new();
        // One flag per open element: whether it is an <si>.
        let mut open_si: Vec<bool> = Vec::new();
        // Depth of the <t> being collected, and whether a child ended its leading text.
        let mut text_depth: Option<usize> = None;
        let mut text_done = false;
        let mut current_text = String::new();

        loop {
            let (ns, event) = reader
                .read_resolved_event_into(&mut buf)
                .map_err(|e| e.to_string())?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let empty = matches!(event, Event::Empty(_));
                    check.open(empty)?;
                    check_start(&ns, e)?;

                    if text_depth.is_some() {
                        text_done = true;
                    }

                    let main_ns = is_spreadsheetml(&ns);
                    let local = e.local_name();
                    let parent_is_si = open_si.last().copied().unwrap_or(false);

                    if main_ns && parent_is_si && local.as_ref() == b"t" {
                        if empty {
                            strings.push(String::new());
                        } else {
                            current_text.clear();
                            text_done = false;
                            text_depth = Some(open_si.len() + 1);
                        }
                    }

                    if !empty {
                        open_si.push(main_ns && local.as_ref() == b"si");
                    }
                }
                Event::Text(e) => {
                    check.text(&e)?;
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    if text_depth == Some(open_si.len()) && !text_done {
                        current_text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if text_depth == Some(open_si.len()) && !text_done {
                        current_text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(_) => {
                    if text_depth == Some(open_si.len()) {
                        strings.push(std::mem::take(&mut current_text));
                        text_depth = None;
                    }
                    open_si.pop();
                    check.close();
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        check.finish()?;
        log::debug!("loaded {} shared strings", strings.len());

        Ok(Self { strings })
    }

    /// Get a string by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the count of shared strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl FromIterator<String> for SharedStrings {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            strings: iter.into_iter().collect(),
        }
    }
}
