//! In-memory grid: the reference implementation of the contract and the
//! test double for both format tags.

use crate::error::IoError;
use crate::format::GridFormat;
use crate::traits::{GridReader, GridSheet, GridWriter, RawCell, SaveDestination};

/// A format-agnostic grid held entirely in memory. Sheets keep workbook
/// order; the first created sheet is the default sheet.
#[derive(Debug, Clone)]
pub struct MemoryGrid {
    format: GridFormat,
    sheets: Vec<GridSheet>,
}

impl MemoryGrid {
    pub fn new(format: GridFormat) -> Self {
        Self {
            format,
            sheets: Vec::new(),
        }
    }

    pub fn format(&self) -> GridFormat {
        self.format
    }

    pub fn sheet(&self, name: &str) -> Option<&GridSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    fn sheet_mut(&mut self, name: &str) -> Option<&mut GridSheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }
}

impl GridReader for MemoryGrid {
    type Error = IoError;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.sheets.iter().map(|s| s.name.clone()).collect())
    }

    fn read_sheet(&mut self, name: &str) -> Result<GridSheet, Self::Error> {
        self.sheet(name)
            .cloned()
            .ok_or_else(|| IoError::sheet_not_found(name))
    }
}

impl GridWriter for MemoryGrid {
    type Error = IoError;

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error> {
        if self.sheet(name).is_some() {
            return Err(IoError::Backend {
                backend: "memory".to_string(),
                message: format!("sheet already exists: {name}"),
            });
        }
        self.sheets.push(GridSheet::new(name));
        Ok(())
    }

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        cell: RawCell,
    ) -> Result<(), Self::Error> {
        let sheet = self
            .sheet_mut(sheet)
            .ok_or_else(|| IoError::sheet_not_found(sheet))?;
        sheet.insert(row, col, cell);
        Ok(())
    }

    fn save_to(&mut self, _dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, Self::Error> {
        Err(IoError::unsupported("serialization", "memory grid"))
    }
}
