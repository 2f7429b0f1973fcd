pub mod backends;
pub mod error;
pub mod format;
pub mod memory;
pub mod traits;

#[cfg(feature = "calamine")]
pub use backends::CalamineGrid;
#[cfg(feature = "umya")]
pub use backends::UmyaGrid;
pub use error::IoError;
pub use format::GridFormat;
pub use memory::MemoryGrid;
pub use traits::{GridReader, GridSheet, GridWriter, RawCell, SaveDestination};
