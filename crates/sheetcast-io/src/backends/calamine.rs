#![cfg(feature = "calamine")]

//! Read backend over `calamine`, covering both format tags.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};

use crate::error::IoError;
use crate::traits::{GridReader, GridSheet, RawCell};

pub struct CalamineGrid {
    workbook: Sheets<BufReader<File>>,
}

impl CalamineGrid {
    /// Open a workbook from disk. The concrete parser (legacy binary or
    /// zipped XML) is chosen by `calamine` from the file itself.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        let workbook = open_workbook_auto(path).map_err(|e| IoError::from_backend("calamine", e))?;
        Ok(Self { workbook })
    }

    fn convert(data: &Data) -> Option<RawCell> {
        match data {
            Data::Empty => None,
            Data::String(s) => Some(RawCell::Text(s.clone())),
            Data::Float(f) => Some(RawCell::Number {
                value: *f,
                date_format: false,
            }),
            Data::Int(i) => Some(RawCell::Number {
                value: *i as f64,
                date_format: false,
            }),
            Data::Bool(b) => Some(RawCell::Bool(*b)),
            Data::Error(e) => Some(RawCell::Error(format!("{e}"))),
            // calamine already consulted the number format for us: a
            // DateTime is a serial number styled as a date.
            Data::DateTime(dt) => Some(RawCell::Number {
                value: dt.as_f64(),
                date_format: true,
            }),
            Data::DateTimeIso(s) => Some(RawCell::Text(s.clone())),
            Data::DurationIso(s) => Some(RawCell::Text(s.clone())),
        }
    }

    fn fill_sheet(sheet: &mut GridSheet, range: &Range<Data>, formulas: Option<&Range<String>>) {
        let (base_row, base_col) = range.start().unwrap_or_default();
        for (row, col, data) in range.used_cells() {
            if let Some(cell) = Self::convert(data) {
                // calamine is 0-based; the grid contract is 1-based.
                sheet.insert(
                    row as u32 + base_row + 1,
                    col as u32 + base_col + 1,
                    cell,
                );
            }
        }

        // A formula cell surfaces as its source text, shadowing any
        // cached value.
        if let Some(formulas) = formulas {
            let (base_row, base_col) = formulas.start().unwrap_or_default();
            for (row, col, formula) in formulas.used_cells() {
                if formula.is_empty() {
                    continue;
                }
                sheet.insert(
                    row as u32 + base_row + 1,
                    col as u32 + base_col + 1,
                    RawCell::Formula(formula.clone()),
                );
            }
        }
    }
}

impl GridReader for CalamineGrid {
    type Error = IoError;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.workbook.sheet_names().to_vec())
    }

    fn read_sheet(&mut self, name: &str) -> Result<GridSheet, Self::Error> {
        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| IoError::from_backend("calamine", e))?;
        let formulas = self.workbook.worksheet_formula(name).ok();

        let mut sheet = GridSheet::new(name);
        Self::fill_sheet(&mut sheet, &range, formulas.as_ref());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sheet = name,
            cells = sheet.cells.len(),
            "read sheet via calamine"
        );

        Ok(sheet)
    }
}
