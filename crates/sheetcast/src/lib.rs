//! Convert between spreadsheet grids and in-memory records.
//!
//! The first row of a sheet is a header; it is bound to destination
//! fields exactly once and the binding is reused for every data row.
//! Cell values cross a bridge into a small dynamic-value type and are
//! coerced to typed destinations under a deterministic rule set.
//!
//! ```
//! use sheetcast::{MapRecord, Reader, Writer};
//! use sheetcast::{CellValue, GridFormat, MemoryGrid};
//!
//! let mut row = MapRecord::new();
//! row.insert("name".to_string(), CellValue::Text("ada".into()));
//! row.insert("score".to_string(), CellValue::Int(3));
//!
//! let mut grid = MemoryGrid::new(GridFormat::Xlsx);
//! Writer::new().maps(&mut grid, &[row]).unwrap();
//!
//! let back = Reader::new().to_maps(&mut grid).unwrap();
//! assert_eq!(back[0]["name"], CellValue::Text("ada".into()));
//! ```

pub mod bridge;
pub mod error;
pub mod read;
pub mod write;

pub use error::{ReadError, WriteError};
pub use read::{BoundReader, MapReader, MapRecord, Reader, ReadResolver, RecordReader, RowView};
pub use write::{BoundWriter, MapWriter, RecordWriter, Writer, WriteResolver};

// Re-export the vocabulary types callers need.
pub use sheetcast_common::{
    AliasTable, CastError, CellValue, FieldDescriptor, FieldKind, FieldValue, LocaleTag,
    RecordSchema, StorageKind, TitleAlias, cast,
};
#[cfg(feature = "calamine")]
pub use sheetcast_io::CalamineGrid;
#[cfg(feature = "umya")]
pub use sheetcast_io::UmyaGrid;
pub use sheetcast_io::{
    GridFormat, GridReader, GridSheet, GridWriter, IoError, MemoryGrid, RawCell, SaveDestination,
};

#[cfg(feature = "calamine")]
mod read_path {
    use std::path::Path;

    use crate::{AliasTable, CalamineGrid, GridFormat, MapRecord, ReadError, Reader, RecordSchema};

    fn open(path: impl AsRef<Path>) -> Result<CalamineGrid, ReadError> {
        // Reject an unrecognized extension before touching the file.
        GridFormat::from_path(&path)?;
        Ok(CalamineGrid::open_path(path)?)
    }

    /// Read the first sheet of a workbook file into open maps.
    pub fn read_maps_from_path(path: impl AsRef<Path>) -> Result<Vec<MapRecord>, ReadError> {
        Reader::new().to_maps(&mut open(path)?)
    }

    /// As [`read_maps_from_path`], translating header titles to aliases.
    pub fn read_maps_from_path_with_aliases(
        path: impl AsRef<Path>,
        aliases: AliasTable,
    ) -> Result<Vec<MapRecord>, ReadError> {
        Reader::new().to_maps_with_aliases(&mut open(path)?, aliases)
    }

    /// Read the first sheet of a workbook file into typed records.
    pub fn read_records_from_path<T: RecordSchema + 'static>(
        path: impl AsRef<Path>,
    ) -> Result<Vec<T>, ReadError> {
        Reader::new().to_records(&mut open(path)?)
    }
}

#[cfg(feature = "calamine")]
pub use read_path::{read_maps_from_path, read_maps_from_path_with_aliases, read_records_from_path};

#[cfg(feature = "umya")]
mod write_path {
    use std::path::Path;

    use crate::{
        GridFormat, GridWriter, MapRecord, MapWriter, RecordSchema, RecordWriter, SaveDestination,
        UmyaGrid, WriteError, Writer,
    };

    /// Write open maps to a workbook file; the format comes from the
    /// file extension. Creates the file, or overwrites it.
    pub fn write_maps_to_path(
        data: &[MapRecord],
        path: impl AsRef<Path>,
    ) -> Result<(), WriteError> {
        let format = GridFormat::from_path(&path)?;
        let mut grid = UmyaGrid::create(format)?;
        Writer::new().write(&mut grid, MapWriter::new(data))?;
        grid.save_to(SaveDestination::Path(path.as_ref()))?;
        Ok(())
    }

    /// Write open maps and return the serialized workbook bytes.
    pub fn write_maps_to_bytes(
        data: &[MapRecord],
        format: GridFormat,
    ) -> Result<Vec<u8>, WriteError> {
        let mut grid = UmyaGrid::create(format)?;
        Writer::new().write(&mut grid, MapWriter::new(data))?;
        let bytes = grid.save_to(SaveDestination::Bytes)?;
        Ok(bytes.unwrap_or_default())
    }

    /// Write typed records to a workbook file in declared field order.
    pub fn write_records_to_path<T: RecordSchema + 'static>(
        data: &[T],
        path: impl AsRef<Path>,
    ) -> Result<(), WriteError> {
        let format = GridFormat::from_path(&path)?;
        let mut grid = UmyaGrid::create(format)?;
        Writer::new().write(&mut grid, RecordWriter::new(data))?;
        grid.save_to(SaveDestination::Path(path.as_ref()))?;
        Ok(())
    }

    /// Write typed records and return the serialized workbook bytes.
    pub fn write_records_to_bytes<T: RecordSchema + 'static>(
        data: &[T],
        format: GridFormat,
    ) -> Result<Vec<u8>, WriteError> {
        let mut grid = UmyaGrid::create(format)?;
        Writer::new().write(&mut grid, RecordWriter::new(data))?;
        let bytes = grid.save_to(SaveDestination::Bytes)?;
        Ok(bytes.unwrap_or_default())
    }
}

#[cfg(feature = "umya")]
pub use write_path::{
    write_maps_to_bytes, write_maps_to_path, write_records_to_bytes, write_records_to_path,
};
