//! Explicit schema descriptors for statically-typed destination records.
//!
//! A record type declares its fields once, as a `'static` slice of
//! [`FieldDescriptor`]s; resolvers bind against that slice a single time
//! per operation and reuse the binding for every row. Nothing is
//! re-derived per row.

use crate::cast::{FieldKind, FieldValue};
use crate::value::CellValue;

/// One declared field of a record type: name, optional column-title
/// override, coercion target, and accessor pair.
pub struct FieldDescriptor<T> {
    pub name: &'static str,
    /// On-disk column title when it differs from the field name.
    pub title: Option<&'static str>,
    pub kind: FieldKind,
    /// Produces the field's dynamic value for the write path. Absent
    /// optional fields surface as [`CellValue::Empty`].
    pub get: fn(&T) -> CellValue,
    /// Stores a coerced value. The engine only ever passes the variant
    /// matching `kind`.
    pub set: fn(&mut T, FieldValue),
}

impl<T> FieldDescriptor<T> {
    pub const fn new(
        name: &'static str,
        kind: FieldKind,
        get: fn(&T) -> CellValue,
        set: fn(&mut T, FieldValue),
    ) -> Self {
        Self {
            name,
            title: None,
            kind,
            get,
            set,
        }
    }

    pub const fn with_title(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    /// The header text this field binds to: the title override when
    /// present, the raw field name otherwise.
    pub fn header(&self) -> &'static str {
        self.title.unwrap_or(self.name)
    }
}

/// A record type that can be read from and written to grid rows.
///
/// `Default` supplies the fresh per-row instance; columns with no bound
/// field leave their destinations at the default value.
pub trait RecordSchema: Default {
    fn fields() -> &'static [FieldDescriptor<Self>]
    where
        Self: Sized;
}
