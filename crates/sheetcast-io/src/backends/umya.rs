#![cfg(feature = "umya")]

//! Write backend over `umya-spreadsheet`. Zipped-XML format only; the
//! ecosystem has no legacy binary writer.

use std::path::{Path, PathBuf};

use umya_spreadsheet::{CellRawValue, NumberingFormat, Spreadsheet};

use crate::error::IoError;
use crate::format::GridFormat;
use crate::traits::{GridReader, GridSheet, GridWriter, RawCell, SaveDestination};

pub struct UmyaGrid {
    book: Spreadsheet,
    path: Option<PathBuf>,
}

impl UmyaGrid {
    /// Create an empty workbook for the given format tag. Only the
    /// zipped-XML tag has a writer in this backend.
    pub fn create(format: GridFormat) -> Result<Self, IoError> {
        match format {
            GridFormat::Xlsx => Ok(Self {
                book: umya_spreadsheet::new_file_empty_worksheet(),
                path: None,
            }),
            GridFormat::Xls => Err(IoError::unsupported(
                "legacy binary (xls) writing",
                "umya backend",
            )),
        }
    }

    /// Open an existing workbook, for read-back.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        let book = umya_spreadsheet::reader::xlsx::read(path.as_ref())
            .map_err(|e| IoError::from_backend("umya", e))?;
        Ok(Self {
            book,
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    fn convert(cv: &umya_spreadsheet::CellValue) -> Option<RawCell> {
        if cv.is_formula() {
            let f = cv.get_formula();
            if !f.is_empty() {
                return Some(RawCell::Formula(f.to_string()));
            }
        }
        match cv.get_raw_value() {
            CellRawValue::Empty => None,
            CellRawValue::Numeric(n) => Some(RawCell::Number {
                value: *n,
                date_format: false,
            }),
            CellRawValue::Bool(b) => Some(RawCell::Bool(*b)),
            CellRawValue::String(s) => Some(RawCell::Text(s.to_string())),
            CellRawValue::RichText(rt) => Some(RawCell::Text(rt.get_text().to_string())),
            CellRawValue::Lazy(s) => {
                let txt = s.as_ref();
                if let Ok(n) = txt.parse::<f64>() {
                    Some(RawCell::Number {
                        value: n,
                        date_format: false,
                    })
                } else if txt.eq_ignore_ascii_case("TRUE") {
                    Some(RawCell::Bool(true))
                } else if txt.eq_ignore_ascii_case("FALSE") {
                    Some(RawCell::Bool(false))
                } else {
                    Some(RawCell::Text(txt.to_string()))
                }
            }
            CellRawValue::Error(_) => Some(RawCell::Error(cv.get_value().to_string())),
        }
    }

    /// Whether a number-format code styles the cell as a date.
    fn is_date_code(code: &str) -> bool {
        code.chars().any(|c| matches!(c, 'y' | 'd' | 'h' | 's'))
            || (code.contains('m') && !code.contains('0') && !code.contains('#'))
    }
}

impl GridWriter for UmyaGrid {
    type Error = IoError;

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error> {
        if self.book.get_sheet_by_name(name).is_some() {
            return Err(IoError::Backend {
                backend: "umya".to_string(),
                message: format!("sheet already exists: {name}"),
            });
        }
        self.book
            .new_sheet(name)
            .map_err(|e| IoError::from_backend("umya", e))?;
        Ok(())
    }

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        cell: RawCell,
    ) -> Result<(), Self::Error> {
        let ws = self
            .book
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| IoError::sheet_not_found(sheet))?;
        // umya addresses cells as (col, row)
        let target = ws.get_cell_mut((col, row));
        match cell {
            RawCell::Blank => {
                target.set_blank();
            }
            RawCell::Number { value, date_format } => {
                target.set_value_number(value);
                if date_format {
                    ws.get_style_mut((col, row))
                        .get_number_format_mut()
                        .set_format_code(NumberingFormat::FORMAT_DATE_XLSX14);
                }
            }
            RawCell::Text(s) => {
                target.set_value(s);
            }
            RawCell::Bool(b) => {
                target.set_value_bool(b);
            }
            RawCell::Formula(f) => {
                target.set_formula(f);
            }
            RawCell::Error(e) => {
                target.set_value(e);
            }
        }
        Ok(())
    }

    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, Self::Error> {
        #[cfg(feature = "tracing")]
        tracing::debug!(sheets = self.book.get_sheet_count(), "saving via umya");
        match dest {
            SaveDestination::Path(path) => {
                umya_spreadsheet::writer::xlsx::write(&self.book, path)
                    .map_err(|e| IoError::from_backend("umya", e))?;
                self.path = Some(path.to_path_buf());
                Ok(None)
            }
            SaveDestination::Writer(writer) => {
                umya_spreadsheet::writer::xlsx::write_writer(&self.book, writer)
                    .map_err(|e| IoError::from_backend("umya", e))?;
                Ok(None)
            }
            SaveDestination::Bytes => {
                let mut buf: Vec<u8> = Vec::new();
                umya_spreadsheet::writer::xlsx::write_writer(&self.book, &mut buf)
                    .map_err(|e| IoError::from_backend("umya", e))?;
                Ok(Some(buf))
            }
        }
    }
}

impl GridReader for UmyaGrid {
    type Error = IoError;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        let count = self.book.get_sheet_count();
        let mut names = Vec::with_capacity(count);
        for i in 0..count {
            if let Some(s) = self.book.get_sheet(&i) {
                names.push(s.get_name().to_string());
            }
        }
        Ok(names)
    }

    fn read_sheet(&mut self, name: &str) -> Result<GridSheet, Self::Error> {
        let converted: Vec<(u32, u32, RawCell)> = {
            let ws = self
                .book
                .get_sheet_by_name(name)
                .ok_or_else(|| IoError::sheet_not_found(name))?;
            ws.get_cell_collection()
                .into_iter()
                .filter_map(|cell| {
                    let coord = cell.get_coordinate();
                    let row = *coord.get_row_num();
                    let col = *coord.get_col_num();
                    Self::convert(cell.get_cell_value()).map(|raw| (row, col, raw))
                })
                .collect()
        };

        // Second pass: number-format styles decide which numerics are
        // dates. Styles need the mutable worksheet accessors.
        let ws = self
            .book
            .get_sheet_by_name_mut(name)
            .ok_or_else(|| IoError::sheet_not_found(name))?;
        let mut sheet = GridSheet::new(name);
        for (row, col, raw) in converted {
            let raw = match raw {
                RawCell::Number { value, .. } => {
                    let code = ws
                        .get_style_mut((col, row))
                        .get_number_format_mut()
                        .get_format_code()
                        .to_string();
                    RawCell::Number {
                        value,
                        date_format: Self::is_date_code(&code),
                    }
                }
                other => other,
            };
            sheet.insert(row, col, raw);
        }
        Ok(sheet)
    }
}
