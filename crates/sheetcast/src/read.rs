//! Grid → records: the read orchestrator and its binding resolvers.
//!
//! Every resolver follows the same two-phase contract: consume the header
//! row once to build a field binding, then apply that binding to each data
//! row. The two phases are split across two types: `bind` consumes the
//! unbound resolver and returns its bound form, so a binding can neither
//! be rebuilt nor used before it exists.

use indexmap::IndexMap;
use sheetcast_common::{AliasTable, CellValue, FieldDescriptor, RecordSchema, cast};
use sheetcast_io::{GridReader, GridSheet, IoError};

use crate::bridge;
use crate::error::ReadError;

/// An open record: header-keyed values in column order.
pub type MapRecord = IndexMap<String, CellValue>;

/// One row of a sheet, addressed by 1-based column index.
pub struct RowView<'a> {
    sheet: &'a GridSheet,
    row: u32,
}

impl<'a> RowView<'a> {
    pub fn new(sheet: &'a GridSheet, row: u32) -> Self {
        Self { sheet, row }
    }

    /// Number of columns up to the last populated cell in this row.
    pub fn width(&self) -> u32 {
        self.sheet.row_width(self.row)
    }

    /// Bridged dynamic value of the cell at `col`.
    pub fn value(&self, col: u32) -> CellValue {
        bridge::read_cell(self.sheet.cell(self.row, col))
    }
}

/// An unbound resolver: all it can do is bind against a header row.
pub trait ReadResolver {
    type Bound: BoundReader;

    fn bind(self, header: &RowView<'_>) -> Result<Self::Bound, ReadError>;
}

/// A bound resolver: processes data rows against the fixed binding and
/// yields the accumulated records.
pub trait BoundReader {
    type Out;

    fn row(&mut self, row: &RowView<'_>, index: u32) -> Result<(), ReadError>;

    fn finish(self) -> Vec<Self::Out>;
}

/// Reads rows into open maps. Header cells become keys in header order,
/// each passed through the alias table; an empty table keeps them
/// verbatim. Data rows are clamped to the header width.
#[derive(Default)]
pub struct MapReader {
    aliases: AliasTable,
}

impl MapReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aliases(aliases: AliasTable) -> Self {
        Self { aliases }
    }
}

impl ReadResolver for MapReader {
    type Bound = BoundMapReader;

    fn bind(self, header: &RowView<'_>) -> Result<Self::Bound, ReadError> {
        let width = header.width();
        let mut keys = Vec::with_capacity(width as usize);
        for col in 1..=width {
            let title = header.value(col).to_string();
            keys.push(self.aliases.alias_for(&title).to_string());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(columns = keys.len(), "bound map header");
        Ok(BoundMapReader {
            keys,
            rows: Vec::new(),
        })
    }
}

pub struct BoundMapReader {
    keys: Vec<String>,
    rows: Vec<MapRecord>,
}

impl BoundReader for BoundMapReader {
    type Out = MapRecord;

    fn row(&mut self, row: &RowView<'_>, _index: u32) -> Result<(), ReadError> {
        let mut map = MapRecord::with_capacity(self.keys.len());
        for (i, key) in self.keys.iter().enumerate() {
            map.insert(key.clone(), row.value(i as u32 + 1));
        }
        self.rows.push(map);
        Ok(())
    }

    fn finish(self) -> Vec<MapRecord> {
        self.rows
    }
}

/// Reads rows into a statically-typed record. Each header cell is matched
/// against the record's declared headers; columns with no matching field
/// are skipped. A fresh `T::default()` is built per row and unbound
/// fields keep their defaults.
pub struct RecordReader<T: RecordSchema + 'static> {
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: RecordSchema + 'static> RecordReader<T> {
    pub fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: RecordSchema + 'static> Default for RecordReader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RecordSchema + 'static> ReadResolver for RecordReader<T> {
    type Bound = BoundRecordReader<T>;

    fn bind(self, header: &RowView<'_>) -> Result<Self::Bound, ReadError> {
        let fields = T::fields();
        let width = header.width();
        let mut slots = Vec::with_capacity(width as usize);
        for col in 1..=width {
            let title = header.value(col).to_string();
            slots.push(fields.iter().find(|f| f.header() == title));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            columns = slots.len(),
            bound = slots.iter().filter(|s| s.is_some()).count(),
            "bound record header"
        );
        Ok(BoundRecordReader {
            slots,
            rows: Vec::new(),
        })
    }
}

pub struct BoundRecordReader<T: RecordSchema + 'static> {
    slots: Vec<Option<&'static FieldDescriptor<T>>>,
    rows: Vec<T>,
}

impl<T: RecordSchema + 'static> BoundReader for BoundRecordReader<T> {
    type Out = T;

    fn row(&mut self, row: &RowView<'_>, index: u32) -> Result<(), ReadError> {
        let mut record = T::default();
        for (i, slot) in self.slots.iter().enumerate() {
            let Some(field) = slot else { continue };
            let col = i as u32 + 1;
            let value = row.value(col);
            match cast(Some(&value), &field.kind) {
                Ok(Some(coerced)) => (field.set)(&mut record, coerced),
                Ok(None) => {}
                Err(source) => {
                    return Err(ReadError::Cell {
                        row: index,
                        col,
                        source,
                    });
                }
            }
        }
        self.rows.push(record);
        Ok(())
    }

    fn finish(self) -> Vec<T> {
        self.rows
    }
}

/// The read orchestrator: selects the sheet, binds the header row once,
/// then feeds every data row to the bound resolver.
#[derive(Default)]
pub struct Reader {
    sheet_name: Option<String>,
}

impl Reader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a named sheet instead of the first one.
    pub fn with_sheet(name: impl Into<String>) -> Self {
        Self {
            sheet_name: Some(name.into()),
        }
    }

    pub fn read<B, R>(
        &self,
        grid: &mut B,
        resolver: R,
    ) -> Result<Vec<<R::Bound as BoundReader>::Out>, ReadError>
    where
        B: GridReader,
        B::Error: Into<IoError>,
        R: ReadResolver,
    {
        let names = grid.sheet_names().map_err(|e| ReadError::Io(e.into()))?;
        let target = match &self.sheet_name {
            Some(name) => names
                .iter()
                .find(|n| *n == name)
                .ok_or_else(|| IoError::sheet_not_found(name))?
                .clone(),
            None => names
                .first()
                .ok_or_else(|| IoError::sheet_not_found("(first sheet)"))?
                .clone(),
        };
        let sheet = grid
            .read_sheet(&target)
            .map_err(|e| ReadError::Io(e.into()))?;

        let mut bound = resolver.bind(&RowView::new(&sheet, 1))?;
        for row in 2..=sheet.last_row() {
            bound.row(&RowView::new(&sheet, row), row)?;
        }
        Ok(bound.finish())
    }

    /// First row becomes map keys; every following row becomes one map.
    pub fn to_maps<B>(&self, grid: &mut B) -> Result<Vec<MapRecord>, ReadError>
    where
        B: GridReader,
        B::Error: Into<IoError>,
    {
        self.read(grid, MapReader::new())
    }

    /// As [`to_maps`](Self::to_maps), with header titles translated to
    /// aliases before they become keys.
    pub fn to_maps_with_aliases<B>(
        &self,
        grid: &mut B,
        aliases: AliasTable,
    ) -> Result<Vec<MapRecord>, ReadError>
    where
        B: GridReader,
        B::Error: Into<IoError>,
    {
        self.read(grid, MapReader::with_aliases(aliases))
    }

    /// Read into statically-typed records.
    pub fn to_records<T, B>(&self, grid: &mut B) -> Result<Vec<T>, ReadError>
    where
        T: RecordSchema + 'static,
        B: GridReader,
        B::Error: Into<IoError>,
    {
        self.read(grid, RecordReader::<T>::new())
    }
}
