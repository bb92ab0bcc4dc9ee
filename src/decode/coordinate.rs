//! Degree/minute coordinate strings, e.g. `35゜30.1'`

use crate::{errors::DecodeError, models::Coordinate};

/// Glyphs separating degrees from minutes. JMA uses the katakana-style `゜`.
const DEGREE_SIGNS: [char; 3] = ['゜', '°', 'º'];
const MINUTE_MARKS: [char; 3] = ['\'', '′', '’'];

/// Decode a latitude; same as [`decode`] but limited to 90 degrees
pub fn decode_latitude(text: &str) -> Result<Coordinate, DecodeError> {
    let coordinate = decode(text)?;
    if coordinate.to_decimal_degrees() > 90.0 {
        return Err(DecodeError::MalformedCoordinate {
            text: text.to_string(),
            reason: "latitude must not exceed 90 degrees",
        });
    }
    Ok(coordinate)
}

/// Decode a sexagesimal angle from a station directory cell.
///
/// The 0 to 180 degree range fits longitudes; use [`decode_latitude`] for
/// the north-south axis.
pub fn decode(text: &str) -> Result<Coordinate, DecodeError> {
    let malformed = |reason| DecodeError::MalformedCoordinate {
        text: text.to_string(),
        reason,
    };

    let stripped = text.replace(&MINUTE_MARKS[..], "");
    let parts: Vec<&str> = stripped.split(&DEGREE_SIGNS[..]).map(str::trim).collect();
    let [degrees, minutes] = parts[..] else {
        return Err(malformed("expected exactly one degree sign"));
    };

    if degrees.is_empty() || minutes.is_empty() {
        return Err(malformed("empty degrees or minutes"));
    }

    let degrees: f64 = degrees
        .parse()
        .map_err(|_| malformed("degrees is not a number"))?;
    let minutes: f64 = minutes
        .parse()
        .map_err(|_| malformed("minutes is not a number"))?;

    if !degrees.is_finite() || degrees.fract() != 0.0 || !(0.0..=180.0).contains(&degrees) {
        return Err(malformed("degrees must be a whole number between 0 and 180"));
    }
    if !minutes.is_finite() || !(0.0..60.0).contains(&minutes) {
        return Err(malformed("minutes must be in [0, 60)"));
    }

    Ok(Coordinate {
        degrees: degrees as i32,
        minutes,
    })
}
