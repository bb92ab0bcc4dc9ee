//! Column layout of a JMA tide table row.
//!
//! Each row is one station-day:
//!
//! ```text
//! [0, 72)     24 hourly levels, 3 chars each
//! [72, 78)    date, YYMMDD (2 chars each)
//! [78, 80)    station code
//! [80, 108)   4 high tide slots, 7 chars each (HHMM + level)
//! [108, 136)  4 low tide slots, same layout
//! ```

use crate::errors::DecodeError;

/// Named byte range within a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, len: usize) -> Self {
        Self { name, offset, len }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Same field moved `by` bytes to the right
    pub const fn shifted(&self, by: usize) -> Self {
        Self::new(self.name, self.offset + by, self.len)
    }

    /// Raw text of the field
    pub fn slice<'a>(&self, row: &'a str) -> Result<&'a str, DecodeError> {
        row.get(self.offset..self.end())
            .ok_or_else(|| DecodeError::MalformedTideRow {
                field: self.name,
                reason: format!("bytes {}..{} not present", self.offset, self.end()),
            })
    }

    /// Parse the field as a right-justified signed integer.
    ///
    /// Space and zero padding are accepted; blanks and a `+` sign are not.
    pub fn parse_int(&self, row: &str) -> Result<i32, DecodeError> {
        let text = self.slice(row)?;
        let trimmed = text.trim();
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        if !is_digits(digits) {
            return Err(self.not_a_number(text, "an integer"));
        }
        trimmed
            .parse::<i32>()
            .map_err(|_| self.not_a_number(text, "an integer"))
    }

    /// Parse the field as an unsigned integer
    pub fn parse_uint(&self, row: &str) -> Result<u32, DecodeError> {
        let text = self.slice(row)?;
        let trimmed = text.trim();
        if !is_digits(trimmed) {
            return Err(self.not_a_number(text, "an unsigned integer"));
        }
        trimmed
            .parse::<u32>()
            .map_err(|_| self.not_a_number(text, "an unsigned integer"))
    }

    fn not_a_number(&self, text: &str, expected: &str) -> DecodeError {
        DecodeError::MalformedTideRow {
            field: self.name,
            reason: format!("{text:?} is not {expected}"),
        }
    }
}

// `str::parse` alone would also take a leading `+`
fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Number of hourly level fields
pub const HOURS: usize = 24;
/// Number of extremum slots per tide direction
pub const EXTREMUM_SLOTS: usize = 4;

/// First hourly level; hour `i` is at `HOURLY_LEVEL.shifted(i * 3)`
pub const HOURLY_LEVEL: Field = Field::new("hourly level", 0, 3);
pub const YEAR: Field = Field::new("year", 72, 2);
pub const MONTH: Field = Field::new("month", 74, 2);
pub const DAY: Field = Field::new("day", 76, 2);
pub const STATION_CODE: Field = Field::new("station code", 78, 2);

/// Whole block of four high tide slots
pub const HIGH_EXTREMA: Field = Field::new("high tide", 80, 28);
/// Whole block of four low tide slots
pub const LOW_EXTREMA: Field = Field::new("low tide", 108, 28);

/// Width of one extremum slot
pub const SLOT_WIDTH: usize = 7;
// Sub-fields relative to the start of a slot
pub const SLOT_HOUR: Field = Field::new("extremum hour", 0, 2);
pub const SLOT_MINUTE: Field = Field::new("extremum minute", 2, 2);
pub const SLOT_LEVEL: Field = Field::new("extremum level", 4, 3);

/// Hour value marking an unused extremum slot
pub const FILLER_HOUR: u32 = 99;

/// Rows shorter than this are malformed. The low tide block may be cut off.
pub const MIN_ROW_LEN: usize = HIGH_EXTREMA.end();

/// Field of the hourly level for `hour`
pub const fn hourly_level(hour: usize) -> Field {
    HOURLY_LEVEL.shifted(hour * HOURLY_LEVEL.len)
}

/// Byte offset of extremum slot `slot` within `block`
pub const fn slot_offset(block: Field, slot: usize) -> usize {
    block.offset + slot * SLOT_WIDTH
}
