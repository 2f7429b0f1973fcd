//! The structural grid contract the mapping engine consumes.
//!
//! Backends expose sheets as sparse 1-based `(row, col)` maps of
//! [`RawCell`]s: the native storage kind plus its payload. Opening and
//! owning the underlying file or stream is the backend's business; the
//! engine only sees these traits.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// A cell as the grid natively stores it.
///
/// Dates have no storage kind of their own: they are numbers carrying the
/// Excel serial representation, distinguished only by a date number
/// format on the cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Blank,
    Number { value: f64, date_format: bool },
    Text(String),
    Bool(bool),
    /// Formula source text, not an evaluated result.
    Formula(String),
    /// A stored error code such as `#DIV/0!`.
    Error(String),
}

/// One sheet's worth of cells, sparse, 1-based.
#[derive(Debug, Clone, Default)]
pub struct GridSheet {
    pub name: String,
    pub cells: BTreeMap<(u32, u32), RawCell>,
    /// Maximum (row, col) seen, or `None` for an empty sheet.
    pub dimensions: Option<(u32, u32)>,
}

impl GridSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            dimensions: None,
        }
    }

    pub fn insert(&mut self, row: u32, col: u32, cell: RawCell) {
        let (mr, mc) = self.dimensions.unwrap_or((0, 0));
        self.dimensions = Some((mr.max(row), mc.max(col)));
        self.cells.insert((row, col), cell);
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&RawCell> {
        self.cells.get(&(row, col))
    }

    /// Index of the last populated row, 0 when the sheet is empty.
    pub fn last_row(&self) -> u32 {
        self.dimensions.map(|(r, _)| r).unwrap_or(0)
    }

    /// Index of the last populated cell within `row`, 0 when the row is
    /// empty.
    pub fn row_width(&self, row: u32) -> u32 {
        self.cells
            .range((row, u32::MIN)..=(row, u32::MAX))
            .map(|((_, c), _)| *c)
            .max()
            .unwrap_or(0)
    }
}

/// Where a writable grid should be serialized.
pub enum SaveDestination<'a> {
    Path(&'a Path),
    Writer(&'a mut dyn Write),
    Bytes,
}

/// Read side of the grid contract.
pub trait GridReader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sheet names in workbook order; the first entry is the default
    /// sheet.
    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    fn read_sheet(&mut self, name: &str) -> Result<GridSheet, Self::Error>;
}

/// Write side of the grid contract.
pub trait GridWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error>;

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        cell: RawCell,
    ) -> Result<(), Self::Error>;

    /// Serialize the grid. Returns the produced bytes for
    /// [`SaveDestination::Bytes`], `None` otherwise.
    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_tracks_bounds() {
        let mut sheet = GridSheet::new("Sheet1");
        assert_eq!(sheet.last_row(), 0);
        sheet.insert(2, 3, RawCell::Text("x".into()));
        sheet.insert(1, 1, RawCell::Bool(true));
        assert_eq!(sheet.dimensions, Some((2, 3)));
        assert_eq!(sheet.last_row(), 2);
        assert_eq!(sheet.row_width(1), 1);
        assert_eq!(sheet.row_width(2), 3);
        assert_eq!(sheet.row_width(5), 0);
    }
}
