//! The cell bridge: grid-native cells in and out of dynamic values.

use sheetcast_common::{CellValue, StorageKind};
use sheetcast_io::RawCell;

/// Read a raw cell into its dynamic value.
///
/// Legacy display semantics apply: a missing or blank cell is the empty
/// string, and a plain (non-date) numeric cell surfaces as its display
/// text rather than a number (what the grid shows, not the raw
/// magnitude). Stored error codes also collapse to the empty string.
pub fn read_cell(raw: Option<&RawCell>) -> CellValue {
    match raw {
        None | Some(RawCell::Blank) | Some(RawCell::Error(_)) => CellValue::Text(String::new()),
        Some(RawCell::Number {
            value,
            date_format: true,
        }) => CellValue::from_serial(*value),
        Some(RawCell::Number {
            value,
            date_format: false,
        }) => CellValue::Text(CellValue::Number(*value).to_string()),
        Some(RawCell::Text(s)) => CellValue::Text(s.clone()),
        Some(RawCell::Formula(s)) => CellValue::Formula(s.clone()),
        Some(RawCell::Bool(b)) => CellValue::Boolean(*b),
    }
}

/// Write a dynamic value as the raw cell for its storage kind. An absent
/// value stores as the empty string.
pub fn write_value(value: Option<&CellValue>) -> RawCell {
    let Some(value) = value else {
        return RawCell::Text(String::new());
    };
    match StorageKind::classify(value) {
        StorageKind::Numeric => RawCell::Number {
            value: value.as_number().unwrap_or(0.0),
            date_format: false,
        },
        StorageKind::Date => RawCell::Number {
            value: value.as_serial().unwrap_or(0.0),
            date_format: true,
        },
        StorageKind::Boolean => RawCell::Bool(matches!(value, CellValue::Boolean(true))),
        StorageKind::Empty => RawCell::Text(String::new()),
        StorageKind::Text => RawCell::Text(value.to_string()),
    }
}
