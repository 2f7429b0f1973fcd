//! Grid format tags and file-extension detection.

use std::fmt;
use std::path::Path;

use crate::error::IoError;

/// The two supported storage formats: legacy binary and zipped XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridFormat {
    Xls,
    Xlsx,
}

impl GridFormat {
    /// Case-insensitive extension match; anything else is no format.
    pub fn from_extension(ext: &str) -> Option<GridFormat> {
        if ext.eq_ignore_ascii_case("xls") {
            Some(GridFormat::Xls)
        } else if ext.eq_ignore_ascii_case("xlsx") {
            Some(GridFormat::Xlsx)
        } else {
            None
        }
    }

    /// Determine the format from a file name. Fails with
    /// [`IoError::UnsupportedFormat`] before any grid is opened when the
    /// extension is missing or unrecognized.
    pub fn from_path(path: impl AsRef<Path>) -> Result<GridFormat, IoError> {
        let path = path.as_ref();
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| IoError::UnsupportedFormat {
                context: format!("no recognized extension on [{}]", path.display()),
            })
    }
}

impl fmt::Display for GridFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GridFormat::Xls => "xls",
            GridFormat::Xlsx => "xlsx",
        })
    }
}
