//! Worksheet row reader.

use crate::error::{Error, Result};
use crate::model::SheetRow;
use crate::options::ExtractOptions;
use quick_xml::events::attributes::Attributes;
use quick_xml::events::Event;
use quick_xml::reader::NsReader;
use std::collections::HashMap;

use super::shared_strings::SharedStrings;
use super::{check_start, is_spreadsheetml, WellFormed};

/// What an open element means to the row reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Row,
    Cell,
    Value,
    Other,
}

/// A `<c>` element being read.
#[derive(Debug, Default)]
struct PendingCell {
    address: Option<String>,
    cell_type: Option<String>,
    /// Text of the first `<v>` child, once one was seen
    value: Option<String>,
    /// Set once a child element inside `<v>` ends its leading text
    value_done: bool,
}

/// Reads the rows of a worksheet, resolving shared string references.
pub struct SheetReader<'a> {
    shared_strings: &'a SharedStrings,
    sheet_index: u32,
    max_rows: u64,
}

impl<'a> SheetReader<'a> {
    /// Create a reader for the sheet and row cap given in `options`.
    pub fn new(shared_strings: &'a SharedStrings, options: &ExtractOptions) -> Self {
        Self {
            shared_strings,
            sheet_index: options.sheet_index,
            max_rows: options.max_rows,
        }
    }

    /// Read populated rows numbered up to the row cap, in document order.
    ///
    /// Row handling stops at the first row numbered above the cap; the rest
    /// of the document is still scanned so that malformed XML is reported.
    pub fn read_rows(&self, xml: &str) -> Result<Vec<SheetRow>> {
        self.read_rows_inner(xml).map_err(|message| Error::SheetParse {
            sheet_index: self.sheet_index,
            message,
        })
    }

    fn read_rows_inner(&self, xml: &str) -> std::result::Result<Vec<SheetRow>, String> {
        let mut rows: Vec<SheetRow> = Vec::new();
        let mut row_positions: HashMap<u64, usize> = HashMap::new();

        let mut reader = NsReader::from_str(xml);
        let mut check = WellFormed::default();
        let mut buf = Vec::new();

        let mut stack: Vec<Open> = Vec::new();
        let mut current_row: Option<SheetRow> = None;
        let mut current_cell: Option<PendingCell> = None;
        let mut capped = false;

        loop {
            let (ns, event) = reader
                .read_resolved_event_into(&mut buf)
                .map_err(|e| e.to_string())?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let empty = matches!(event, Event::Empty(_));
                    check.open(empty)?;
                    check_start(&ns, e)?;

                    let parent = stack.last().copied();
                    if parent == Some(Open::Value) {
                        if let Some(cell) = current_cell.as_mut() {
                            cell.value_done = true;
                        }
                    }
                    let local = e.local_name();
                    let mut open = Open::Other;

                    if !capped && is_spreadsheetml(&ns) {
                        match local.as_ref() {
                            b"row" if current_row.is_none() => {
                                let number = row_number(e.attributes())?;
                                if number > self.max_rows {
                                    log::debug!(
                                        "row {} exceeds max_rows {}, stopping",
                                        number,
                                        self.max_rows
                                    );
                                    capped = true;
                                } else {
                                    current_row = Some(SheetRow::new(number));
                                    open = Open::Row;
                                }
                            }
                            b"c" if parent == Some(Open::Row) => {
                                current_cell = Some(pending_cell(e.attributes())?);
                                open = Open::Cell;
                            }
                            b"v" if parent == Some(Open::Cell) => {
                                if let Some(cell) = current_cell.as_mut() {
                                    if cell.value.is_none() {
                                        cell.value = Some(String::new());
                                        open = Open::Value;
                                    }
                                }
                            }
                            _ => {}
                        }
                    }

                    if empty {
                        self.close(open, &mut current_row, &mut current_cell, |row| {
                            insert_row(&mut rows, &mut row_positions, row)
                        })?;
                    } else {
                        stack.push(open);
                    }
                }
                Event::Text(e) => {
                    check.text(&e)?;
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    if stack.last() == Some(&Open::Value) {
                        push_value_text(&mut current_cell, &text);
                    }
                }
                Event::CData(e) => {
                    if stack.last() == Some(&Open::Value) {
                        push_value_text(&mut current_cell, &String::from_utf8_lossy(&e));
                    }
                }
                Event::End(_) => {
                    let open = stack.pop().unwrap_or(Open::Other);
                    check.close();
                    self.close(open, &mut current_row, &mut current_cell, |row| {
                        insert_row(&mut rows, &mut row_positions, row)
                    })?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        check.finish()?;
        log::debug!(
            "sheet{}.xml: {} populated rows",
            self.sheet_index,
            rows.len()
        );

        Ok(rows)
    }

    /// Finish the element that just closed.
    fn close(
        &self,
        open: Open,
        current_row: &mut Option<SheetRow>,
        current_cell: &mut Option<PendingCell>,
        on_row: impl FnOnce(SheetRow),
    ) -> std::result::Result<(), String> {
        match open {
            Open::Row => {
                if let Some(row) = current_row.take() {
                    if !row.is_empty() {
                        on_row(row);
                    }
                }
            }
            Open::Cell => {
                if let Some(cell) = current_cell.take() {
                    if let (Some(row), Some(value)) = (current_row.as_mut(), cell.value) {
                        if !value.is_empty() {
                            let value = self.resolve_cell_value(&value, cell.cell_type.as_deref())?;
                            match cell.address {
                                Some(address) => row.set(address, value),
                                None => log::warn!(
                                    "row {}: skipping cell without an address",
                                    row.number
                                ),
                            }
                        }
                    }
                }
            }
            Open::Value | Open::Other => {}
        }
        Ok(())
    }

    /// Resolve a cell value based on its type.
    ///
    /// Shared string cells (`t="s"`) look up the table; an index outside the
    /// table keeps the raw text. Every other type is returned verbatim.
    fn resolve_cell_value(
        &self,
        value: &str,
        cell_type: Option<&str>,
    ) -> std::result::Result<String, String> {
        if cell_type != Some("s") {
            return Ok(value.to_string());
        }

        let resolved = parse_shared_index(value)?.and_then(|idx| self.shared_strings.get(idx));
        match resolved {
            Some(text) => Ok(text.to_string()),
            None => {
                log::warn!(
                    "shared string index {} out of range (table has {}), keeping raw value",
                    value,
                    self.shared_strings.len()
                );
                Ok(value.to_string())
            }
        }
    }
}

/// Read a row's `r` attribute as a row number.
fn row_number(attributes: Attributes) -> std::result::Result<u64, String> {
    let raw = attribute(attributes, b"r")?
        .ok_or_else(|| "row element is missing its 'r' attribute".to_string())?;
    raw.trim()
        .parse()
        .map_err(|_| format!("invalid row number {:?}", raw))
}

fn pending_cell(attributes: Attributes) -> std::result::Result<PendingCell, String> {
    let mut cell = PendingCell::default();
    for attr in attributes {
        let attr = attr.map_err(|e| e.to_string())?;
        match attr.key.as_ref() {
            b"r" => cell.address = Some(attr.unescape_value().map_err(|e| e.to_string())?.into()),
            b"t" => {
                cell.cell_type = Some(attr.unescape_value().map_err(|e| e.to_string())?.into())
            }
            _ => {}
        }
    }
    Ok(cell)
}

fn attribute(attributes: Attributes, key: &[u8]) -> std::result::Result<Option<String>, String> {
    for attr in attributes {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Append to the leading text of the open `<v>`.
fn push_value_text(cell: &mut Option<PendingCell>, text: &str) {
    if let Some(cell) = cell.as_mut().filter(|c| !c.value_done) {
        if let Some(value) = cell.value.as_mut() {
            value.push_str(text);
        }
    }
}

/// Later rows with a repeated number replace the earlier cells in place.
fn insert_row(rows: &mut Vec<SheetRow>, positions: &mut HashMap<u64, usize>, row: SheetRow) {
    match positions.get(&row.number) {
        Some(&pos) => rows[pos] = row,
        None => {
            positions.insert(row.number, rows.len());
            rows.push(row);
        }
    }
}

/// Parse a shared string index.
///
/// Returns `Ok(None)` for integers that cannot index the table (negative or
/// too large), and an error for text that is not an integer at all.
fn parse_shared_index(raw: &str) -> std::result::Result<Option<usize>, String> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid shared string index {:?}", raw));
    }

    if negative {
        return Ok(digits.bytes().all(|b| b == b'0').then_some(0));
    }
    Ok(digits.parse().ok())
}
