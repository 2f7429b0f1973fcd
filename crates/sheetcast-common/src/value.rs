use chrono::{Duration as ChronoDur, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/* ───────────────────── Excel date-serial utilities ───────────────────
Excel's serial date system:
  Serial 1  = 1900-01-01
  Serial 59 = 1900-02-28
  Serial 60 = 1900-02-29  (phantom – doesn't exist, but Excel thinks it does)
  Serial 61 = 1900-03-01
Base date = 1899-12-31 so that serial 1 = base + 1 day = 1900-01-01.
Time is stored as fractional days (no timezone).
------------------------------------------------------------------- */

/// Base date for the 1900 date system. Serial 1 = base + 1 day = 1900-01-01.
const SERIAL_EPOCH: NaiveDate = NaiveDate::from_ymd_opt(1899, 12, 31).unwrap();

pub fn datetime_to_serial(dt: &NaiveDateTime) -> f64 {
    let days = (dt.date() - SERIAL_EPOCH).num_days();
    // Dates on or after 1900-03-01 get +1 to account for phantom Feb 29
    let serial_days = if dt.date() >= NaiveDate::from_ymd_opt(1900, 3, 1).unwrap() {
        days + 1
    } else {
        days
    };

    let secs_in_day = dt.time().num_seconds_from_midnight() as f64;
    serial_days as f64 + secs_in_day / 86_400.0
}

pub fn serial_to_datetime(serial: f64) -> NaiveDateTime {
    let days = serial.trunc() as i64;
    let frac_secs = (serial.fract() * 86_400.0).round() as i64;

    // Serial 60 is phantom 1900-02-29; map to 1900-02-28
    let date = if days == 60 {
        NaiveDate::from_ymd_opt(1900, 2, 28).unwrap()
    } else {
        // serial < 60: offset = serial (no phantom day yet)
        // serial > 60: offset = serial - 1 (skip phantom day)
        let offset = if days < 60 { days } else { days - 1 };
        SERIAL_EPOCH + ChronoDur::days(offset)
    };

    let time =
        NaiveTime::from_num_seconds_from_midnight_opt((frac_secs.rem_euclid(86_400)) as u32, 0)
            .unwrap();
    date.and_time(time)
}

/// The dynamic value produced by reading a cell and consumed when writing
/// one. This is the only representation that crosses the cell bridge; no
/// information beyond these variants survives the trip.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(chrono::NaiveDate),
    DateTime(chrono::NaiveDateTime),
    /// Formula source text, never an evaluated result.
    Formula(String),
    Empty,
}

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Formula(s) => write!(f, "{s}"),
            CellValue::Empty => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Numeric view across both numeric variants.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view shared by plain text and formula source.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) | CellValue::Formula(s) => Some(s),
            _ => None,
        }
    }

    /// Serial-number form of a date variant.
    pub fn as_serial(&self) -> Option<f64> {
        match self {
            CellValue::Date(d) => {
                let dt = d.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
                Some(datetime_to_serial(&dt))
            }
            CellValue::DateTime(dt) => Some(datetime_to_serial(dt)),
            _ => None,
        }
    }

    /// Build the appropriate date variant from an Excel serial number.
    pub fn from_serial(serial: f64) -> Self {
        let dt = serial_to_datetime(serial);
        if dt.time() == NaiveTime::from_hms_opt(0, 0, 0).unwrap() {
            CellValue::Date(dt.date())
        } else {
            CellValue::DateTime(dt)
        }
    }
}

/// The small set of grid-native value categories a cell can store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Numeric,
    Boolean,
    Date,
    Text,
    Empty,
}

impl StorageKind {
    /// Classify a dynamic value into the storage kind used on the write
    /// path. All numerics widen to `Numeric`; anything without a native
    /// representation falls back to `Text` via its display form.
    pub fn classify(value: &CellValue) -> StorageKind {
        match value {
            CellValue::Int(_) | CellValue::Number(_) => StorageKind::Numeric,
            CellValue::Boolean(_) => StorageKind::Boolean,
            CellValue::Date(_) | CellValue::DateTime(_) => StorageKind::Date,
            CellValue::Empty => StorageKind::Empty,
            CellValue::Text(_) | CellValue::Formula(_) => StorageKind::Text,
        }
    }
}

impl Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageKind::Numeric => "numeric",
            StorageKind::Boolean => "boolean",
            StorageKind::Date => "date",
            StorageKind::Text => "text",
            StorageKind::Empty => "empty",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn serial_roundtrip_modern_date() {
        // Excel 1900 serial for 2023-03-01.
        let dt = NaiveDate::from_ymd_opt(2023, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let serial = datetime_to_serial(&dt);
        assert_eq!(serial, 44986.0);
        assert_eq!(serial_to_datetime(serial), dt);
    }

    #[test]
    fn serial_phantom_leap_day_maps_to_feb_28() {
        let dt = serial_to_datetime(60.0);
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(1900, 2, 28).unwrap());
    }

    #[test]
    fn serial_preserves_time_fraction() {
        let dt = NaiveDate::from_ymd_opt(2020, 1, 14)
            .unwrap()
            .and_hms_opt(13, 30, 0)
            .unwrap();
        assert_eq!(serial_to_datetime(datetime_to_serial(&dt)), dt);
    }

    #[test]
    fn from_serial_splits_date_and_datetime() {
        let midnight = CellValue::from_serial(44986.0);
        assert_eq!(
            midnight,
            CellValue::Date(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap())
        );
        assert!(matches!(
            CellValue::from_serial(44986.5),
            CellValue::DateTime(_)
        ));
    }

    #[test]
    fn classify_covers_every_variant() {
        assert_eq!(
            StorageKind::classify(&CellValue::Int(7)),
            StorageKind::Numeric
        );
        assert_eq!(
            StorageKind::classify(&CellValue::Number(7.5)),
            StorageKind::Numeric
        );
        assert_eq!(
            StorageKind::classify(&CellValue::Boolean(true)),
            StorageKind::Boolean
        );
        assert_eq!(
            StorageKind::classify(&CellValue::Date(
                NaiveDate::from_ymd_opt(2020, 1, 14).unwrap()
            )),
            StorageKind::Date
        );
        assert_eq!(
            StorageKind::classify(&CellValue::Text("x".into())),
            StorageKind::Text
        );
        assert_eq!(
            StorageKind::classify(&CellValue::Formula("=A1*2".into())),
            StorageKind::Text
        );
        assert_eq!(StorageKind::classify(&CellValue::Empty), StorageKind::Empty);
    }

    #[test]
    fn display_renders_like_a_cell() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(3.5).to_string(), "3.5");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(
            CellValue::Date(NaiveDate::from_ymd_opt(2020, 1, 14).unwrap()).to_string(),
            "2020-01-14"
        );
    }
}
