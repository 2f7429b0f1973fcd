//! Records → grid: the write orchestrator and its binding resolvers.
//!
//! Mirrors the read side's two-phase contract: `bind` fixes the column
//! layout and produces the header titles once; the bound form then yields
//! one value row per record in that fixed order.

use sheetcast_common::{AliasTable, CellValue, FieldDescriptor, RecordSchema};
use sheetcast_io::{GridWriter, IoError, RawCell};

use crate::bridge;
use crate::error::WriteError;
use crate::read::MapRecord;

/// An unbound write resolver: binds the column layout and emits header
/// titles.
pub trait WriteResolver {
    type Bound: BoundWriter;

    fn bind(self) -> Result<(Vec<String>, Self::Bound), WriteError>;
}

/// A bound write resolver: yields each record's values in bound column
/// order.
pub trait BoundWriter {
    fn rows(&self) -> usize;

    fn row(&mut self, index: usize) -> Result<Vec<CellValue>, WriteError>;
}

/// Writes open maps.
///
/// Without a collation the header is the first record's keys in insertion
/// order, and every record must carry exactly that key set; differing
/// keys fail fast rather than silently misaligning columns. With a
/// collation the listed keys define order and count: keys missing from a
/// record contribute an empty cell, unlisted keys are filtered out.
pub struct MapWriter<'a> {
    data: &'a [MapRecord],
    aliases: AliasTable,
    collation: Option<Vec<String>>,
}

impl<'a> MapWriter<'a> {
    pub fn new(data: &'a [MapRecord]) -> Self {
        Self {
            data,
            aliases: AliasTable::default(),
            collation: None,
        }
    }

    /// Translate map keys to column titles through `aliases`.
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// Order (and filter) columns by an explicit key list.
    pub fn with_collation(mut self, collation: Vec<String>) -> Self {
        self.collation = Some(collation);
        self
    }
}

impl<'a> WriteResolver for MapWriter<'a> {
    type Bound = BoundMapWriter<'a>;

    fn bind(self) -> Result<(Vec<String>, Self::Bound), WriteError> {
        let uniform_keys = self.collation.is_none();
        let columns = match self.collation {
            Some(collation) => collation,
            None => self
                .data
                .first()
                .ok_or_else(|| {
                    WriteError::Layout(
                        "cannot derive a header from an empty record list".to_string(),
                    )
                })?
                .keys()
                .cloned()
                .collect(),
        };
        let header = columns
            .iter()
            .map(|key| self.aliases.title_for(key).to_string())
            .collect();
        Ok((
            header,
            BoundMapWriter {
                data: self.data,
                columns,
                uniform_keys,
            },
        ))
    }
}

pub struct BoundMapWriter<'a> {
    data: &'a [MapRecord],
    columns: Vec<String>,
    /// Set when the header was derived from the first record; every
    /// record must then match that key set exactly.
    uniform_keys: bool,
}

impl BoundWriter for BoundMapWriter<'_> {
    fn rows(&self) -> usize {
        self.data.len()
    }

    fn row(&mut self, index: usize) -> Result<Vec<CellValue>, WriteError> {
        let record = &self.data[index];
        if self.uniform_keys
            && (record.len() != self.columns.len()
                || !self.columns.iter().all(|key| record.contains_key(key)))
        {
            return Err(WriteError::Row {
                row: index as u32 + 2,
                message: "record keys differ from the bound header".to_string(),
            });
        }
        Ok(self
            .columns
            .iter()
            .map(|key| record.get(key).cloned().unwrap_or(CellValue::Empty))
            .collect())
    }
}

/// Writes statically-typed records. Column order is the declared field
/// order, or a collation of field names; the collation may filter fields
/// but must not exceed the declared field list or name an unknown field.
pub struct RecordWriter<'a, T: RecordSchema + 'static> {
    data: &'a [T],
    collation: Option<Vec<String>>,
}

impl<'a, T: RecordSchema + 'static> RecordWriter<'a, T> {
    pub fn new(data: &'a [T]) -> Self {
        Self {
            data,
            collation: None,
        }
    }

    pub fn with_collation(mut self, collation: Vec<String>) -> Self {
        self.collation = Some(collation);
        self
    }
}

impl<'a, T: RecordSchema + 'static> WriteResolver for RecordWriter<'a, T> {
    type Bound = BoundRecordWriter<'a, T>;

    fn bind(self) -> Result<(Vec<String>, Self::Bound), WriteError> {
        let fields = T::fields();
        let bound: Vec<&'static FieldDescriptor<T>> = match self.collation {
            None => fields.iter().collect(),
            Some(collation) => {
                if collation.len() > fields.len() {
                    return Err(WriteError::Layout(
                        "the collation must not be longer than the declared field list"
                            .to_string(),
                    ));
                }
                collation
                    .iter()
                    .map(|name| {
                        fields.iter().find(|f| f.name == name).ok_or_else(|| {
                            WriteError::Layout(format!("no field named [{name}]"))
                        })
                    })
                    .collect::<Result<_, _>>()?
            }
        };
        let header = bound.iter().map(|f| f.header().to_string()).collect();
        Ok((
            header,
            BoundRecordWriter {
                data: self.data,
                fields: bound,
            },
        ))
    }
}

pub struct BoundRecordWriter<'a, T: RecordSchema + 'static> {
    data: &'a [T],
    fields: Vec<&'static FieldDescriptor<T>>,
}

impl<T: RecordSchema + 'static> BoundWriter for BoundRecordWriter<'_, T> {
    fn rows(&self) -> usize {
        self.data.len()
    }

    fn row(&mut self, index: usize) -> Result<Vec<CellValue>, WriteError> {
        let record = &self.data[index];
        Ok(self.fields.iter().map(|f| (f.get)(record)).collect())
    }
}

/// The write orchestrator: creates the sheet, emits the header row once,
/// then one grid row per record.
pub struct Writer {
    sheet_name: String,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self {
            sheet_name: "sheet1".to_string(),
        }
    }

    pub fn with_sheet(name: impl Into<String>) -> Self {
        Self {
            sheet_name: name.into(),
        }
    }

    pub fn write<W, R>(&self, grid: &mut W, resolver: R) -> Result<(), WriteError>
    where
        W: GridWriter,
        W::Error: Into<IoError>,
        R: WriteResolver,
    {
        let (header, mut bound) = resolver.bind()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sheet = %self.sheet_name,
            columns = header.len(),
            rows = bound.rows(),
            "bound write layout"
        );

        grid.create_sheet(&self.sheet_name)
            .map_err(|e| WriteError::Io(e.into()))?;
        for (i, title) in header.iter().enumerate() {
            self.put(grid, 1, i as u32 + 1, RawCell::Text(title.clone()))?;
        }
        for index in 0..bound.rows() {
            let values = bound.row(index)?;
            let row = index as u32 + 2;
            for (i, value) in values.iter().enumerate() {
                self.put(grid, row, i as u32 + 1, bridge::write_value(Some(value)))?;
            }
        }
        Ok(())
    }

    fn put<W>(&self, grid: &mut W, row: u32, col: u32, cell: RawCell) -> Result<(), WriteError>
    where
        W: GridWriter,
        W::Error: Into<IoError>,
    {
        grid.write_cell(&self.sheet_name, row, col, cell)
            .map_err(|e| WriteError::Cell {
                row,
                col,
                source: e.into(),
            })
    }

    /// Write open maps; see [`MapWriter`] for the layout rules.
    pub fn maps<W>(&self, grid: &mut W, data: &[MapRecord]) -> Result<(), WriteError>
    where
        W: GridWriter,
        W::Error: Into<IoError>,
    {
        self.write(grid, MapWriter::new(data))
    }

    /// Write statically-typed records in declared field order.
    pub fn records<W, T>(&self, grid: &mut W, data: &[T]) -> Result<(), WriteError>
    where
        W: GridWriter,
        W::Error: Into<IoError>,
        T: RecordSchema + 'static,
    {
        self.write(grid, RecordWriter::new(data))
    }
}
