// src/database/models.rs
use uuid::Uuid;

use crate::models::{Coordinate, StationCode, StationRecord};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StationRow {
    id: String,
    jma_id: String,
    station_code: String,
    station_name: String,
    latitude_degrees: i32,
    latitude_minutes: f64,
    longitude_degrees: i32,
    longitude_minutes: f64,
}

impl TryFrom<StationRow> for StationRecord {
    type Error = sqlx::Error;

    fn try_from(row: StationRow) -> Result<Self, Self::Error> {
        Ok(StationRecord {
            id: Uuid::parse_str(&row.id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            jma_id: row.jma_id,
            station_code: StationCode::try_from(row.station_code)
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            station_name: row.station_name,
            latitude: Coordinate {
                degrees: row.latitude_degrees,
                minutes: row.latitude_minutes,
            },
            longitude: Coordinate {
                degrees: row.longitude_degrees,
                minutes: row.longitude_minutes,
            },
        })
    }
}
