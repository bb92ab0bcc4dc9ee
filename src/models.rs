//! Data models.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::errors::DecodeError;

/// Offset of Japan Standard Time from UTC. JST has no daylight saving.
pub const JST_OFFSET_SECONDS: i32 = 9 * 3600;

/// Build a fixed UTC offset from whole hours, None if out of range.
pub fn utc_offset_from_hours(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}

/// Short code identifying a tide station in the tide tables
///
/// Two to four ASCII alphanumeric characters, e.g. `D8` or `TK`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode(String);

impl TryFrom<&str> for StationCode {
    type Error = DecodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let valid = (2..=4).contains(&value.len())
            && value.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(DecodeError::InvalidStationCode(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for StationCode {
    type Error = DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl StationCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Angle in whole degrees and decimal minutes, as printed in the station directory
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub degrees: i32,
    /// Minutes of arc, in the range `[0, 60)`
    pub minutes: f64,
}

impl Coordinate {
    pub fn to_decimal_degrees(&self) -> f64 {
        self.degrees as f64 + self.minutes / 60.0
    }
}

/// Tide observation station from the JMA station directory
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    /// Surrogate identifier, generated when the directory is decoded
    pub id: Uuid,
    /// Agency-issued identifier. Kept as text, it may carry leading zeros.
    pub jma_id: String,
    /// Join key into the tide tables
    pub station_code: StationCode,
    pub station_name: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
}

/// Calendar date of a tide table row, local to the station (UTC+9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowDate {
    pub year: i32,
    /// 1 - 12
    pub month: u32,
    pub day: u32,
}

impl RowDate {
    /// Create a date, rejecting days that do not exist in the calendar
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DecodeError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|_| Self { year, month, day })
            .ok_or(DecodeError::InvalidDate { year, month, day })
    }

    /// Attach a clock time to the date
    pub fn at(&self, hour: u32, minute: u32) -> Result<RowDateTime, DecodeError> {
        if hour > 23 || minute > 59 {
            return Err(DecodeError::InvalidTime { hour, minute });
        }
        Ok(RowDateTime {
            year: self.year,
            month: self.month,
            day: self.day,
            hour,
            minute,
        })
    }
}

/// Local wall-clock time of a tidal event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 0 - 23
    pub hour: u32,
    /// 0 - 59
    pub minute: u32,
}

impl RowDateTime {
    pub fn naive(&self) -> Option<NaiveDateTime> {
        Some(NaiveDateTime::new(
            NaiveDate::from_ymd_opt(self.year, self.month, self.day)?,
            NaiveTime::from_hms_opt(self.hour, self.minute, 0)?,
        ))
    }

    /// Interpret the fields as wall-clock time at the given offset.
    ///
    /// The host timezone is never consulted.
    pub fn to_local(&self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        offset.from_local_datetime(&self.naive()?).single()
    }

    /// The UTC instant of this local time, e.g. 09:00 at UTC+9 is 00:00 UTC
    pub fn to_utc(&self, offset: FixedOffset) -> Option<DateTime<Utc>> {
        self.to_local(offset).map(|dt| dt.with_timezone(&Utc))
    }
}

/// High or low tide reading inside one station-day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extremum {
    pub hour: u32,
    pub minute: u32,
    /// Water level in centimeters
    pub level: i32,
}

/// Kind of tidal event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Hourly,
    High,
    Low,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Hourly => "hourly",
            EventKind::High => "high",
            EventKind::Low => "low",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Water level sample or extremum at one station
#[derive(Debug, Clone, PartialEq)]
pub struct TidalEvent {
    pub local_date_time: RowDateTime,
    /// Soft reference to [`StationRecord::station_code`]
    pub station_code: StationCode,
    /// Water level in centimeters, may be negative
    pub level: i32,
    pub kind: EventKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(JST_OFFSET_SECONDS).unwrap()
    }

    #[test]
    fn station_code_validation() {
        assert_eq!(StationCode::try_from("D8").unwrap().as_str(), "D8");
        assert!(StationCode::try_from("TKYO").is_ok());
        assert!(StationCode::try_from("D").is_err());
        assert!(StationCode::try_from("ABCDE").is_err());
        assert!(StationCode::try_from("D ").is_err());
        assert!(StationCode::try_from("").is_err());
    }

    #[test]
    fn row_date_rejects_impossible_days() {
        assert!(RowDate::new(2025, 2, 28).is_ok());
        assert!(RowDate::new(2024, 2, 29).is_ok());
        assert_eq!(
            RowDate::new(2025, 2, 29),
            Err(DecodeError::InvalidDate {
                year: 2025,
                month: 2,
                day: 29
            })
        );
        assert!(RowDate::new(2025, 13, 1).is_err());
        assert!(RowDate::new(2025, 0, 1).is_err());
    }

    #[test]
    fn row_date_at_validates_clock() {
        let date = RowDate::new(2025, 1, 1).unwrap();
        assert!(date.at(23, 59).is_ok());
        assert_eq!(
            date.at(24, 0),
            Err(DecodeError::InvalidTime {
                hour: 24,
                minute: 0
            })
        );
        assert!(date.at(12, 60).is_err());
    }

    #[test]
    fn utc_conversion_subtracts_fixed_offset() {
        let local = RowDate::new(2025, 1, 1).unwrap().at(3, 15).unwrap();
        let utc = local.to_utc(jst()).unwrap();

        // Crosses the date line backwards
        assert_eq!(utc.year(), 2024);
        assert_eq!(utc.month(), 12);
        assert_eq!(utc.day(), 31);
        assert_eq!(utc.hour(), 18);
        assert_eq!(utc.minute(), 15);
    }

    #[test]
    fn local_conversion_keeps_wall_clock() {
        let local = RowDate::new(2025, 6, 30).unwrap().at(21, 0).unwrap();
        let dt = local.to_local(jst()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-30T21:00:00+09:00");
    }

    #[test]
    fn utc_offset_bounds() {
        assert_eq!(utc_offset_from_hours(9), Some(jst()));
        assert!(utc_offset_from_hours(-12).is_some());
        assert!(utc_offset_from_hours(30).is_none());
    }

    #[test]
    fn coordinate_decimal_degrees() {
        let c = Coordinate {
            degrees: 35,
            minutes: 30.0,
        };
        assert!((c.to_decimal_degrees() - 35.5).abs() < 1e-9);
    }

    #[test]
    fn event_kind_text() {
        assert_eq!(EventKind::Hourly.as_str(), "hourly");
        assert_eq!(EventKind::High.to_string(), "high");
        assert_eq!(EventKind::Low.to_string(), "low");
    }
}
