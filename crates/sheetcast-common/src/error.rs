use thiserror::Error;

use crate::cast::FieldKind;
use crate::value::CellValue;

/// A value could not be coerced to a requested field kind.
///
/// Carries the attempted target and the offending value's display form;
/// resolvers wrap this with row/column coordinates before surfacing it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot cast to {target}, value: {value}")]
pub struct CastError {
    pub target: &'static str,
    pub value: String,
}

impl CastError {
    pub fn new(kind: &FieldKind, value: &CellValue) -> Self {
        Self {
            target: kind.name(),
            value: value.to_string(),
        }
    }
}
