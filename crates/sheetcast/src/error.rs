use sheetcast_common::CastError;
use sheetcast_io::IoError;
use thiserror::Error;

/// Failures while reading a grid into records.
#[derive(Debug, Error)]
pub enum ReadError {
    /// A cell's value could not be coerced to its bound field.
    #[error("read failed at row {row}, column {col}: {source}")]
    Cell {
        row: u32,
        col: u32,
        #[source]
        source: CastError,
    },

    #[error(transparent)]
    Io(#[from] IoError),
}

/// Failures while writing records into a grid.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The grid rejected a cell write.
    #[error("write failed at row {row}, column {col}: {source}")]
    Cell {
        row: u32,
        col: u32,
        #[source]
        source: IoError,
    },

    /// A record does not fit the bound column layout.
    #[error("row {row}: {message}")]
    Row { row: u32, message: String },

    /// The column layout itself could not be bound.
    #[error("{0}")]
    Layout(String),

    #[error(transparent)]
    Io(#[from] IoError),
}
