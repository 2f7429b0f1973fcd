//! The value coercion engine.
//!
//! `cast` turns a dynamic [`CellValue`] into a typed [`FieldValue`] for a
//! requested [`FieldKind`], under a deterministic rule set. `Ok(None)` means
//! "store nothing": the destination field keeps its default. The inverse
//! direction (typed value → storage kind) lives on
//! [`StorageKind::classify`](crate::value::StorageKind::classify).

use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::CastError;
use crate::value::CellValue;

/// Coercion target descriptor. One per destination field, built once as
/// part of a schema descriptor and reused for every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Decimal,
    BigInt,
    Text,
    Date,
    /// Enumeration with its member names in declaration order.
    Enum(&'static [&'static str]),
    Locale,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Char => "char",
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::Decimal => "decimal",
            FieldKind::BigInt => "bigint",
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Enum(_) => "enum",
            FieldKind::Locale => "locale",
        }
    }
}

/// A coerced, typed destination value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    BigInt(i128),
    Text(String),
    Date(NaiveDateTime),
    /// Ordinal of the selected enumeration member.
    Enum(usize),
    Locale(LocaleTag),
}

/// Locale identifier split into up to three `_`-separated parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTag {
    pub language: String,
    pub region: Option<String>,
    pub variant: Option<String>,
}

impl LocaleTag {
    pub fn parse(s: &str) -> Self {
        let mut items = s.split('_');
        LocaleTag {
            language: items.next().unwrap_or_default().to_string(),
            region: items.next().map(str::to_string),
            variant: items.next().map(str::to_string),
        }
    }
}

/// Coerce a dynamic value into `kind`.
///
/// `None` input models an absent source value: numeric kinds yield their
/// zero value, `Bool` yields `false`, everything else yields `None`.
pub fn cast(value: Option<&CellValue>, kind: &FieldKind) -> Result<Option<FieldValue>, CastError> {
    let Some(value) = value else {
        return Ok(absent(kind));
    };
    match kind {
        FieldKind::Bool => cast_bool(value),
        FieldKind::Char => cast_char(value),
        FieldKind::I8 | FieldKind::I16 | FieldKind::I32 | FieldKind::I64 => {
            cast_integral(value, kind)
        }
        FieldKind::F32 | FieldKind::F64 => cast_float(value, kind),
        FieldKind::Decimal => cast_decimal(value),
        FieldKind::BigInt => cast_bigint(value),
        FieldKind::Text => cast_text(value),
        FieldKind::Date => cast_date(value),
        FieldKind::Enum(members) => cast_enum(value, members, kind),
        FieldKind::Locale => cast_locale(value),
    }
}

fn absent(kind: &FieldKind) -> Option<FieldValue> {
    match kind {
        FieldKind::Bool => Some(FieldValue::Bool(false)),
        FieldKind::I8 => Some(FieldValue::I8(0)),
        FieldKind::I16 => Some(FieldValue::I16(0)),
        FieldKind::I32 => Some(FieldValue::I32(0)),
        FieldKind::I64 => Some(FieldValue::I64(0)),
        FieldKind::F32 => Some(FieldValue::F32(0.0)),
        FieldKind::F64 => Some(FieldValue::F64(0.0)),
        _ => None,
    }
}

/// Text view with `Empty` behaving as the empty string, the way a blank
/// cell surfaces on the read path.
fn str_like(value: &CellValue) -> Option<&str> {
    match value {
        CellValue::Text(s) | CellValue::Formula(s) => Some(s),
        CellValue::Empty => Some(""),
        _ => None,
    }
}

fn is_null_text(s: &str) -> bool {
    s.is_empty() || s == "null" || s == "NULL"
}

fn cast_bool(value: &CellValue) -> Result<Option<FieldValue>, CastError> {
    if let CellValue::Boolean(b) = value {
        return Ok(Some(FieldValue::Bool(*b)));
    }
    if let Some(n) = value.as_number() {
        // Only an exact 0/1 carries a boolean meaning.
        return match n {
            n if n == 1.0 => Ok(Some(FieldValue::Bool(true))),
            n if n == 0.0 => Ok(Some(FieldValue::Bool(false))),
            _ => Err(CastError::new(&FieldKind::Bool, value)),
        };
    }
    if let Some(s) = str_like(value) {
        if is_null_text(s) {
            return Ok(None);
        }
        for t in ["true", "1", "y", "t"] {
            if s.eq_ignore_ascii_case(t) {
                return Ok(Some(FieldValue::Bool(true)));
            }
        }
        for f in ["false", "0", "f", "n"] {
            if s.eq_ignore_ascii_case(f) {
                return Ok(Some(FieldValue::Bool(false)));
            }
        }
    }
    Err(CastError::new(&FieldKind::Bool, value))
}

fn cast_char(value: &CellValue) -> Result<Option<FieldValue>, CastError> {
    let Some(s) = str_like(value) else {
        return Err(CastError::new(&FieldKind::Char, value));
    };
    if s.is_empty() {
        return Ok(None);
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Some(FieldValue::Char(c))),
        _ => Err(CastError::new(&FieldKind::Char, value)),
    }
}

fn narrow(wide: i64, kind: &FieldKind) -> FieldValue {
    match kind {
        FieldKind::I8 => FieldValue::I8(wide as i8),
        FieldKind::I16 => FieldValue::I16(wide as i16),
        FieldKind::I32 => FieldValue::I32(wide as i32),
        _ => FieldValue::I64(wide),
    }
}

fn cast_integral(value: &CellValue, kind: &FieldKind) -> Result<Option<FieldValue>, CastError> {
    let wide = match value {
        CellValue::Int(i) => *i,
        CellValue::Number(n) => *n as i64,
        CellValue::Boolean(b) => *b as i64,
        _ => {
            let Some(s) = str_like(value) else {
                return Err(CastError::new(kind, value));
            };
            if is_null_text(s) {
                return Ok(None);
            }
            // Thousands separators are presentation, not data.
            let cleaned: String = s.chars().filter(|c| *c != ',').collect();
            cleaned
                .parse::<i64>()
                .map_err(|_| CastError::new(kind, value))?
        }
    };
    Ok(Some(narrow(wide, kind)))
}

fn cast_float(value: &CellValue, kind: &FieldKind) -> Result<Option<FieldValue>, CastError> {
    let wide = match value.as_number() {
        Some(n) => n,
        None => {
            let Some(s) = str_like(value) else {
                return Err(CastError::new(kind, value));
            };
            if is_null_text(s) {
                return Ok(None);
            }
            let cleaned: String = s.chars().filter(|c| *c != ',').collect();
            cleaned
                .parse::<f64>()
                .map_err(|_| CastError::new(kind, value))?
        }
    };
    Ok(Some(match kind {
        FieldKind::F32 => FieldValue::F32(wide as f32),
        _ => FieldValue::F64(wide),
    }))
}

fn cast_decimal(value: &CellValue) -> Result<Option<FieldValue>, CastError> {
    if let Some(s) = str_like(value) {
        if s.is_empty() {
            return Ok(None);
        }
    }
    match value {
        CellValue::Int(_) | CellValue::Number(_) | CellValue::Text(_) | CellValue::Formula(_) => {
            let canonical = value.to_string();
            Decimal::from_str(&canonical)
                .or_else(|_| Decimal::from_scientific(&canonical))
                .map(|d| Some(FieldValue::Decimal(d)))
                .map_err(|_| CastError::new(&FieldKind::Decimal, value))
        }
        _ => Err(CastError::new(&FieldKind::Decimal, value)),
    }
}

fn cast_bigint(value: &CellValue) -> Result<Option<FieldValue>, CastError> {
    match value {
        CellValue::Int(i) => Ok(Some(FieldValue::BigInt(*i as i128))),
        CellValue::Number(n) => Ok(Some(FieldValue::BigInt(*n as i128))),
        _ => {
            let Some(s) = str_like(value) else {
                return Err(CastError::new(&FieldKind::BigInt, value));
            };
            if is_null_text(s) {
                return Ok(None);
            }
            s.parse::<i128>()
                .map(|i| Some(FieldValue::BigInt(i)))
                .map_err(|_| CastError::new(&FieldKind::BigInt, value))
        }
    }
}

fn cast_text(value: &CellValue) -> Result<Option<FieldValue>, CastError> {
    Ok(Some(FieldValue::Text(value.to_string())))
}

fn epoch_millis(ms: i64, value: &CellValue) -> Result<Option<FieldValue>, CastError> {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms)
        .map(|dt| Some(FieldValue::Date(dt.naive_utc())))
        .ok_or_else(|| CastError::new(&FieldKind::Date, value))
}

fn cast_date(value: &CellValue) -> Result<Option<FieldValue>, CastError> {
    match value {
        CellValue::DateTime(dt) => return Ok(Some(FieldValue::Date(*dt))),
        CellValue::Date(d) => {
            return Ok(Some(FieldValue::Date(d.and_time(chrono::NaiveTime::MIN))));
        }
        CellValue::Int(i) => return epoch_millis(*i, value),
        CellValue::Number(n) => return epoch_millis(*n as i64, value),
        _ => {}
    }
    let Some(s) = str_like(value) else {
        return Err(CastError::new(&FieldKind::Date, value));
    };

    // JSON-era epoch wrapper: /Date(1579000000000)/
    let s = match s.strip_prefix("/Date(").and_then(|r| r.strip_suffix(")/")) {
        Some(inner) => inner,
        None => s,
    };

    if s.contains('-') {
        // Pick a parse pattern from the string's shape.
        if s.len() == 29 && s.as_bytes().get(26) == Some(&b':') {
            return chrono::DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.3f%:z")
                .map(|dt| Some(FieldValue::Date(dt.naive_utc())))
                .map_err(|_| CastError::new(&FieldKind::Date, value));
        }
        let format = match s.len() {
            10 => "%Y-%m-%d",
            19 => "%Y-%m-%d %H:%M:%S",
            _ => "%Y-%m-%d %H:%M:%S%.3f",
        };
        let parsed = if format == "%Y-%m-%d" {
            chrono::NaiveDate::parse_from_str(s, format).map(|d| d.and_time(chrono::NaiveTime::MIN))
        } else {
            NaiveDateTime::parse_from_str(s, format)
        };
        return parsed
            .map(|dt| Some(FieldValue::Date(dt)))
            .map_err(|_| CastError::new(&FieldKind::Date, value));
    }
    if s.is_empty() {
        return Ok(None);
    }
    let ms = s
        .parse::<i64>()
        .map_err(|_| CastError::new(&FieldKind::Date, value))?;
    epoch_millis(ms, value)
}

fn cast_enum(
    value: &CellValue,
    members: &'static [&'static str],
    kind: &FieldKind,
) -> Result<Option<FieldValue>, CastError> {
    if let Some(s) = str_like(value) {
        if s.is_empty() {
            return Ok(None);
        }
        return members
            .iter()
            .position(|m| *m == s)
            .map(|i| Some(FieldValue::Enum(i)))
            .ok_or_else(|| CastError::new(kind, value));
    }
    if let Some(n) = value.as_number() {
        let ordinal = n as i64;
        if ordinal >= 0 && (ordinal as usize) < members.len() {
            return Ok(Some(FieldValue::Enum(ordinal as usize)));
        }
    }
    Err(CastError::new(kind, value))
}

fn cast_locale(value: &CellValue) -> Result<Option<FieldValue>, CastError> {
    let Some(s) = str_like(value) else {
        return Err(CastError::new(&FieldKind::Locale, value));
    };
    if s.is_empty() {
        return Ok(None);
    }
    Ok(Some(FieldValue::Locale(LocaleTag::parse(s))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn absent_input_zeroes_numerics_and_bools() {
        assert_eq!(cast(None, &FieldKind::I32), Ok(Some(FieldValue::I32(0))));
        assert_eq!(cast(None, &FieldKind::F64), Ok(Some(FieldValue::F64(0.0))));
        assert_eq!(
            cast(None, &FieldKind::Bool),
            Ok(Some(FieldValue::Bool(false)))
        );
        assert_eq!(cast(None, &FieldKind::Text), Ok(None));
        assert_eq!(cast(None, &FieldKind::Date), Ok(None));
    }

    #[test]
    fn empty_string_is_null_for_numeric_targets() {
        assert_eq!(cast(Some(&text("")), &FieldKind::I32), Ok(None));
        assert_eq!(cast(Some(&text("null")), &FieldKind::I64), Ok(None));
        assert_eq!(cast(Some(&text("NULL")), &FieldKind::F64), Ok(None));
    }

    #[test]
    fn garbage_string_fails_integral_cast() {
        let err = cast(Some(&text("abc")), &FieldKind::I32).unwrap_err();
        assert_eq!(err.target, "i32");
        assert_eq!(err.value, "abc");
    }

    #[test]
    fn thousands_separators_are_stripped() {
        assert_eq!(
            cast(Some(&text("1,234,567")), &FieldKind::I64),
            Ok(Some(FieldValue::I64(1_234_567)))
        );
        assert_eq!(
            cast(Some(&text("1,234.5")), &FieldKind::F64),
            Ok(Some(FieldValue::F64(1234.5)))
        );
    }

    #[test]
    fn narrowing_truncates() {
        assert_eq!(
            cast(Some(&CellValue::Number(3.9)), &FieldKind::I32),
            Ok(Some(FieldValue::I32(3)))
        );
        assert_eq!(
            cast(Some(&CellValue::Int(300)), &FieldKind::I8),
            Ok(Some(FieldValue::I8(300i64 as i8)))
        );
    }

    #[test]
    fn bool_accepts_only_zero_and_one_numerics() {
        assert_eq!(
            cast(Some(&CellValue::Int(1)), &FieldKind::Bool),
            Ok(Some(FieldValue::Bool(true)))
        );
        assert_eq!(
            cast(Some(&CellValue::Number(0.0)), &FieldKind::Bool),
            Ok(Some(FieldValue::Bool(false)))
        );
        assert!(cast(Some(&CellValue::Number(3.0)), &FieldKind::Bool).is_err());
    }

    #[test]
    fn bool_string_forms() {
        for s in ["true", "TRUE", "1", "y", "T"] {
            assert_eq!(
                cast(Some(&text(s)), &FieldKind::Bool),
                Ok(Some(FieldValue::Bool(true))),
                "{s}"
            );
        }
        for s in ["false", "0", "N", "f"] {
            assert_eq!(
                cast(Some(&text(s)), &FieldKind::Bool),
                Ok(Some(FieldValue::Bool(false))),
                "{s}"
            );
        }
        assert_eq!(cast(Some(&text("")), &FieldKind::Bool), Ok(None));
        assert!(cast(Some(&text("maybe")), &FieldKind::Bool).is_err());
    }

    #[test]
    fn date_only_string_has_no_time_component() {
        let got = cast(Some(&text("2020-01-14")), &FieldKind::Date).unwrap();
        assert_eq!(
            got,
            Some(FieldValue::Date(
                NaiveDate::from_ymd_opt(2020, 1, 14)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            ))
        );
    }

    #[test]
    fn date_string_shapes() {
        let with_secs = cast(Some(&text("2020-01-14 10:30:05")), &FieldKind::Date).unwrap();
        assert_eq!(
            with_secs,
            Some(FieldValue::Date(
                NaiveDate::from_ymd_opt(2020, 1, 14)
                    .unwrap()
                    .and_hms_opt(10, 30, 5)
                    .unwrap()
            ))
        );
        let with_millis = cast(Some(&text("2020-01-14 10:30:05.250")), &FieldKind::Date).unwrap();
        assert_eq!(
            with_millis,
            Some(FieldValue::Date(
                NaiveDate::from_ymd_opt(2020, 1, 14)
                    .unwrap()
                    .and_hms_milli_opt(10, 30, 5, 250)
                    .unwrap()
            ))
        );
        let iso_offset =
            cast(Some(&text("2020-01-14T10:30:05.250+02:00")), &FieldKind::Date).unwrap();
        assert_eq!(
            iso_offset,
            Some(FieldValue::Date(
                NaiveDate::from_ymd_opt(2020, 1, 14)
                    .unwrap()
                    .and_hms_milli_opt(8, 30, 5, 250)
                    .unwrap()
            ))
        );
        assert!(cast(Some(&text("14/01/2020-x")), &FieldKind::Date).is_err());
    }

    #[test]
    fn date_epoch_forms() {
        let from_number = cast(Some(&CellValue::Int(0)), &FieldKind::Date).unwrap();
        assert_eq!(
            from_number,
            Some(FieldValue::Date(
                NaiveDate::from_ymd_opt(1970, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            ))
        );
        let wrapped = cast(Some(&text("/Date(86400000)/")), &FieldKind::Date).unwrap();
        assert_eq!(
            wrapped,
            Some(FieldValue::Date(
                NaiveDate::from_ymd_opt(1970, 1, 2)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            ))
        );
        let bare = cast(Some(&text("86400000")), &FieldKind::Date).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn existing_dates_pass_through() {
        let dt = NaiveDate::from_ymd_opt(2023, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(
            cast(Some(&CellValue::DateTime(dt)), &FieldKind::Date),
            Ok(Some(FieldValue::Date(dt)))
        );
    }

    #[test]
    fn enum_by_name_and_ordinal() {
        const MEMBERS: &[&str] = &["Red", "Green", "Blue"];
        let kind = FieldKind::Enum(MEMBERS);
        assert_eq!(
            cast(Some(&text("Green")), &kind),
            Ok(Some(FieldValue::Enum(1)))
        );
        // Member match is case-sensitive.
        assert!(cast(Some(&text("green")), &kind).is_err());
        assert_eq!(cast(Some(&text("")), &kind), Ok(None));
        assert_eq!(
            cast(Some(&CellValue::Int(2)), &kind),
            Ok(Some(FieldValue::Enum(2)))
        );
        assert!(cast(Some(&CellValue::Int(3)), &kind).is_err());
    }

    #[test]
    fn locale_splits_on_underscore() {
        let got = cast(Some(&text("en_US_posix")), &FieldKind::Locale).unwrap();
        assert_eq!(
            got,
            Some(FieldValue::Locale(LocaleTag {
                language: "en".to_string(),
                region: Some("US".to_string()),
                variant: Some("posix".to_string()),
            }))
        );
        let bare = cast(Some(&text("fr")), &FieldKind::Locale).unwrap();
        assert_eq!(
            bare,
            Some(FieldValue::Locale(LocaleTag {
                language: "fr".to_string(),
                region: None,
                variant: None,
            }))
        );
    }

    #[test]
    fn decimal_and_bigint_parse_canonical_strings() {
        assert_eq!(
            cast(Some(&text("123.456")), &FieldKind::Decimal),
            Ok(Some(FieldValue::Decimal("123.456".parse().unwrap())))
        );
        assert_eq!(cast(Some(&text("")), &FieldKind::Decimal), Ok(None));
        assert_eq!(
            cast(Some(&CellValue::Number(2.5)), &FieldKind::Decimal),
            Ok(Some(FieldValue::Decimal("2.5".parse().unwrap())))
        );
        assert_eq!(
            cast(
                Some(&text("170141183460469231731687303715884105")),
                &FieldKind::BigInt
            ),
            Ok(Some(FieldValue::BigInt(170141183460469231731687303715884105)))
        );
        assert!(cast(Some(&text("not-a-number")), &FieldKind::Decimal).is_err());
    }

    #[test]
    fn text_target_keeps_empty_string() {
        assert_eq!(
            cast(Some(&text("")), &FieldKind::Text),
            Ok(Some(FieldValue::Text(String::new())))
        );
        assert_eq!(
            cast(Some(&CellValue::Number(3.0)), &FieldKind::Text),
            Ok(Some(FieldValue::Text("3".to_string())))
        );
    }

    #[test]
    fn char_wants_exactly_one_character() {
        assert_eq!(
            cast(Some(&text("x")), &FieldKind::Char),
            Ok(Some(FieldValue::Char('x')))
        );
        assert_eq!(cast(Some(&text("")), &FieldKind::Char), Ok(None));
        assert!(cast(Some(&text("xy")), &FieldKind::Char).is_err());
    }

    #[test]
    fn formula_text_coerces_like_a_string() {
        assert_eq!(
            cast(Some(&CellValue::Formula("42".into())), &FieldKind::I32),
            Ok(Some(FieldValue::I32(42)))
        );
    }

    #[test]
    fn unmatched_combination_names_the_target() {
        let err = cast(
            Some(&CellValue::Boolean(true)),
            &FieldKind::Date,
        )
        .unwrap_err();
        assert_eq!(err.target, "date");
    }
}
