//! Sheet data structures.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// A worksheet row holding only its populated cells.
///
/// Cells keep document order. Serializes as a JSON object from cell
/// address to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based row number from the row's `r` attribute
    pub number: u64,
    /// (address, value) pairs in document order
    pub cells: Vec<(String, String)>,
}

impl SheetRow {
    /// Create an empty row.
    pub fn new(number: u64) -> Self {
        Self {
            number,
            cells: Vec::new(),
        }
    }

    /// Set a cell value. A repeated address keeps its original position
    /// and takes the new value.
    pub fn set(&mut self, address: impl Into<String>, value: impl Into<String>) {
        let address = address.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(a, _)| *a == address) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((address, value)),
        }
    }

    /// Get a cell value by address.
    pub fn get(&self, address: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, v)| v.as_str())
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no populated cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for SheetRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (address, value) in &self.cells {
            map.serialize_entry(address, value)?;
        }
        map.end()
    }
}

/// Rows extracted from one worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetData {
    /// Source spreadsheet path, as given by the caller
    pub file: String,
    /// Requested 1-based sheet index
    pub sheet_index: u32,
    /// Populated rows in document order
    pub rows: Vec<SheetRow>,
}

impl SheetData {
    /// Number of populated rows.
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Get a row by its row number.
    pub fn row(&self, number: u64) -> Option<&SheetRow> {
        self.rows.iter().find(|row| row.number == number)
    }
}

/// Row list serialized as an object keyed by row number.
struct RowMap<'a>(&'a [SheetRow]);

impl Serialize for RowMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for row in self.0 {
            map.serialize_entry(&row.number, row)?;
        }
        map.end()
    }
}

impl Serialize for SheetData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SheetData", 5)?;
        state.serialize_field("success", &true)?;
        state.serialize_field("file", &self.file)?;
        state.serialize_field("sheet_index", &self.sheet_index)?;
        state.serialize_field("total_rows", &self.total_rows())?;
        state.serialize_field("data", &RowMap(&self.rows))?;
        state.end()
    }
}
