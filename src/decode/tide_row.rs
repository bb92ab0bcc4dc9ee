//! One row of a JMA tide table, i.e. one station-day.
//!
//! See [`super::layout`] for the column layout.

use super::layout::{
    self, Field, DAY, EXTREMUM_SLOTS, FILLER_HOUR, HIGH_EXTREMA, HOURS, LOW_EXTREMA, MIN_ROW_LEN,
    MONTH, SLOT_HOUR, SLOT_LEVEL, SLOT_MINUTE, STATION_CODE, YEAR,
};
use crate::{
    errors::DecodeError,
    models::{EventKind, Extremum, RowDate, RowDateTime, StationCode, TidalEvent},
};

/// Century added to the two-digit year when none is configured
pub const DEFAULT_CENTURY: i32 = 2000;

/// Contents of one decoded row
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRow {
    pub date: RowDate,
    pub station_code: StationCode,
    /// Level in centimeters; index is the clock hour
    pub hourly_levels: [i32; HOURS],
    /// High tides in slot order, filler slots removed
    pub high_extrema: Vec<Extremum>,
    /// Low tides in slot order, filler slots removed
    pub low_extrema: Vec<Extremum>,
    /// Extremum slots that could not be decoded and were left out
    pub slot_failures: Vec<DecodeError>,
}

impl DecodedRow {
    /// 24 hourly events in ascending hour
    pub fn hourly_events(&self) -> impl Iterator<Item = TidalEvent> + '_ {
        self.hourly_levels
            .iter()
            .enumerate()
            .map(move |(hour, &level)| self.event(hour as u32, 0, level, EventKind::Hourly))
    }

    /// High tide events followed by low tide events, each in slot order
    pub fn extremum_events(&self) -> impl Iterator<Item = TidalEvent> + '_ {
        let highs = self.high_extrema.iter().map(|e| (e, EventKind::High));
        let lows = self.low_extrema.iter().map(|e| (e, EventKind::Low));
        highs
            .chain(lows)
            .map(move |(e, kind)| self.event(e.hour, e.minute, e.level, kind))
    }

    fn event(&self, hour: u32, minute: u32, level: i32, kind: EventKind) -> TidalEvent {
        TidalEvent {
            local_date_time: RowDateTime {
                year: self.date.year,
                month: self.date.month,
                day: self.date.day,
                hour,
                minute,
            },
            station_code: self.station_code.clone(),
            level,
            kind,
        }
    }
}

/// Decoder for single tide table rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TideRowDecoder {
    century: i32,
}

impl Default for TideRowDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_CENTURY)
    }
}

impl TideRowDecoder {
    /// Create a decoder resolving two-digit years as `century + yy`
    pub fn new(century: i32) -> Self {
        Self { century }
    }

    pub fn century(&self) -> i32 {
        self.century
    }

    /// Decode a row.
    ///
    /// A malformed date, station code or hourly level fails the whole row.
    /// A malformed extremum slot is dropped and recorded in
    /// [`DecodedRow::slot_failures`].
    pub fn decode(&self, row: &str) -> Result<DecodedRow, DecodeError> {
        let row = row.trim_end_matches(['\r', '\n']);
        if row.len() < MIN_ROW_LEN {
            return Err(DecodeError::MalformedTideRow {
                field: "row",
                reason: format!("{} bytes, need at least {}", row.len(), MIN_ROW_LEN),
            });
        }

        let mut hourly_levels = [0; HOURS];
        for (hour, level) in hourly_levels.iter_mut().enumerate() {
            *level = layout::hourly_level(hour).parse_int(row)?;
        }

        let date = self.decode_date(row)?;
        let code = STATION_CODE.slice(row)?;
        let station_code = StationCode::try_from(code)?;

        let mut slot_failures = Vec::new();
        let high_extrema = decode_extrema(row, HIGH_EXTREMA, &date, &mut slot_failures);
        let low_extrema = decode_extrema(row, LOW_EXTREMA, &date, &mut slot_failures);

        Ok(DecodedRow {
            date,
            station_code,
            hourly_levels,
            high_extrema,
            low_extrema,
            slot_failures,
        })
    }

    fn decode_date(&self, row: &str) -> Result<RowDate, DecodeError> {
        let year = YEAR.parse_uint(row)?;
        let month = MONTH.parse_uint(row)?;
        let day = DAY.parse_uint(row)?;
        // A century near i32::MAX overflows here
        let full_year = self
            .century
            .checked_add(year as i32)
            .ok_or(DecodeError::InvalidDate {
                year: self.century,
                month,
                day,
            })?;
        RowDate::new(full_year, month, day)
    }
}

fn decode_extrema(
    row: &str,
    block: Field,
    date: &RowDate,
    failures: &mut Vec<DecodeError>,
) -> Vec<Extremum> {
    let mut extrema = Vec::with_capacity(EXTREMUM_SLOTS);
    for slot in 0..EXTREMUM_SLOTS {
        match decode_slot(row, layout::slot_offset(block, slot), date) {
            Ok(Some(extremum)) => extrema.push(extremum),
            Ok(None) => {}
            Err(e) => failures.push(e),
        }
    }
    extrema
}

/// Decode one 7-byte slot; `None` for filler and for slots past the row end
fn decode_slot(row: &str, offset: usize, date: &RowDate) -> Result<Option<Extremum>, DecodeError> {
    if row.len() <= offset {
        return Ok(None);
    }

    let hour = SLOT_HOUR.shifted(offset).parse_uint(row)?;
    if hour == FILLER_HOUR {
        return Ok(None);
    }
    let minute = SLOT_MINUTE.shifted(offset).parse_uint(row)?;
    let level = SLOT_LEVEL.shifted(offset).parse_int(row)?;
    date.at(hour, minute)?;

    Ok(Some(Extremum {
        hour,
        minute,
        level,
    }))
}
