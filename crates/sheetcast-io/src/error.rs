use thiserror::Error;

/// Failures raised by the grid storage layer.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A named sheet was requested but the grid does not contain it.
    #[error("sheet with the name [{name}] was not found")]
    SheetNotFound { name: String },

    /// The format tag is absent or not one of the recognized tags.
    #[error("unsupported grid format: {context}")]
    UnsupportedFormat { context: String },

    /// The operation is valid for the contract but not for this backend.
    #[error("{feature} not supported: {context}")]
    Unsupported { feature: String, context: String },

    #[error("{backend} backend error: {message}")]
    Backend { backend: String, message: String },
}

impl IoError {
    pub fn from_backend(backend: &str, err: impl std::fmt::Display) -> Self {
        IoError::Backend {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }

    pub fn sheet_not_found(name: impl Into<String>) -> Self {
        IoError::SheetNotFound { name: name.into() }
    }

    pub fn unsupported(feature: impl Into<String>, context: impl Into<String>) -> Self {
        IoError::Unsupported {
            feature: feature.into(),
            context: context.into(),
        }
    }
}
