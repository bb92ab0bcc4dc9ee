// src/database.rs
mod models;

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use chrono::FixedOffset;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    config::DatabaseConfig,
    errors::{DecodeError, TideRecorderError},
    models::{StationCode, StationRecord, TidalEvent},
};
use models::StationRow;

const TABLES: [(&str, &str); 2] = [
    (
        "tide_station",
        "CREATE TABLE IF NOT EXISTS tide_station (
            id TEXT PRIMARY KEY,
            jma_id TEXT NOT NULL,
            station_code TEXT NOT NULL UNIQUE,
            station_name TEXT NOT NULL,
            latitude_degrees INTEGER NOT NULL,
            latitude_minutes REAL NOT NULL,
            longitude_degrees INTEGER NOT NULL,
            longitude_minutes REAL NOT NULL
        )",
    ),
    (
        "tidal_event",
        "CREATE TABLE IF NOT EXISTS tidal_event (
            id TEXT PRIMARY KEY,
            station_id TEXT REFERENCES tide_station (id),
            station_code TEXT NOT NULL,
            local_date_time TEXT NOT NULL,
            utc_date_time TEXT NOT NULL,
            level INTEGER NOT NULL,
            type TEXT NOT NULL,
            UNIQUE (station_code, utc_date_time, type)
        )",
    ),
];

const INDICES: [(&str, &str); 2] = [
    (
        "idx_tidal_event_station_code",
        "CREATE INDEX IF NOT EXISTS idx_tidal_event_station_code ON tidal_event(station_code)",
    ),
    (
        "idx_tidal_event_utc_date_time",
        "CREATE INDEX IF NOT EXISTS idx_tidal_event_utc_date_time ON tidal_event(utc_date_time)",
    ),
];

/// SQLite store for tide stations and tidal events
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database file from configuration, creating it if needed
    pub async fn open(config: &DatabaseConfig) -> Result<Self, TideRecorderError> {
        config.validate()?;
        Self::from_path(&config.path).await
    }

    /// Open or create the database file with WAL journaling and foreign keys on
    pub async fn from_path(path: &Path) -> Result<Self, TideRecorderError> {
        info!("Opening database at {}", path.display());
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| TideRecorderError::DatabaseOpenError {
                path: path.to_path_buf(),
                origin: e.to_string(),
            })?;

        Self::new(pool).await
    }

    /// Open from a `sqlite:` URL, e.g. `sqlite::memory:`
    pub async fn from_url(url: &str) -> Result<Self, TideRecorderError> {
        let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true);
        // One connection, so an in-memory database is shared by all queries
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::new(pool).await
    }

    /// Wrap an existing pool and create tables and indices
    pub async fn new(pool: SqlitePool) -> Result<Self, TideRecorderError> {
        let db = Self { pool };
        if let Err(e) = db.create_tables_indices().await {
            error!("Failed to create database tables: {}", e);
            return Err(e);
        }
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables `tide_station` and `tidal_event`.
    ///
    /// Add indices on `tidal_event` columns `station_code` and `utc_date_time`
    async fn create_tables_indices(&self) -> Result<(), TideRecorderError> {
        for (table, sql) in TABLES {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| TideRecorderError::TableCreationError {
                    table: table.to_string(),
                    origin: e.to_string(),
                })?;
        }

        for (index, sql) in INDICES {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| TideRecorderError::IndexCreationError {
                    index: index.to_string(),
                    origin: e.to_string(),
                })?;
        }

        Ok(())
    }

    /// Insert stations in one transaction.
    ///
    /// A station whose code is already stored keeps its stored id; the other
    /// columns are updated. Returns the number of rows written.
    pub async fn insert_stations(&self, stations: &[StationRecord]) -> Result<u64, TideRecorderError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for station in stations {
            written += sqlx::query(
                "INSERT INTO tide_station (
                    id, jma_id, station_code, station_name,
                    latitude_degrees, latitude_minutes, longitude_degrees, longitude_minutes
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT (station_code) DO UPDATE SET
                    jma_id = excluded.jma_id,
                    station_name = excluded.station_name,
                    latitude_degrees = excluded.latitude_degrees,
                    latitude_minutes = excluded.latitude_minutes,
                    longitude_degrees = excluded.longitude_degrees,
                    longitude_minutes = excluded.longitude_minutes",
            )
            .bind(station.id.to_string())
            .bind(&station.jma_id)
            .bind(station.station_code.as_str())
            .bind(&station.station_name)
            .bind(station.latitude.degrees)
            .bind(station.latitude.minutes)
            .bind(station.longitude.degrees)
            .bind(station.longitude.minutes)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    /// All stored stations, ordered by station code
    pub async fn get_stations(&self) -> Result<Vec<StationRecord>, TideRecorderError> {
        let rows: Vec<StationRow> = sqlx::query_as(
            "SELECT id, jma_id, station_code, station_name,
                latitude_degrees, latitude_minutes, longitude_degrees, longitude_minutes
            FROM tide_station ORDER BY station_code",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| StationRecord::try_from(row).map_err(TideRecorderError::from))
            .collect()
    }

    /// Stored id of the station with `code`
    pub async fn station_id(&self, code: &StationCode) -> Result<Option<Uuid>, TideRecorderError> {
        let id: Option<String> =
            sqlx::query_scalar("SELECT id FROM tide_station WHERE station_code = ?1")
                .bind(code.as_str())
                .fetch_optional(&self.pool)
                .await?;

        id.map(|id| {
            Uuid::parse_str(&id)
                .map_err(|e| TideRecorderError::from(sqlx::Error::Decode(Box::new(e))))
        })
        .transpose()
    }

    /// Insert tidal events in one transaction.
    ///
    /// Each event gets a new id and the id of its station, looked up by
    /// station code. Events of unknown stations are stored without a station
    /// id. Local times are interpreted at `offset`. Events already stored
    /// for the same station, instant and type are skipped. Returns the number
    /// of rows written.
    pub async fn insert_tidal_events(
        &self,
        events: &[TidalEvent],
        offset: FixedOffset,
    ) -> Result<u64, TideRecorderError> {
        let mut tx = self.pool.begin().await?;
        let mut station_ids: HashMap<StationCode, Option<String>> = HashMap::new();
        let mut written = 0;

        for event in events {
            if !station_ids.contains_key(&event.station_code) {
                let id: Option<String> =
                    sqlx::query_scalar("SELECT id FROM tide_station WHERE station_code = ?1")
                        .bind(event.station_code.as_str())
                        .fetch_optional(&mut *tx)
                        .await?;
                if id.is_none() {
                    warn!(
                        "Station {} is not stored, its events have no station id",
                        event.station_code
                    );
                }
                station_ids.insert(event.station_code.clone(), id);
            }
            let station_id = station_ids.get(&event.station_code).cloned().flatten();

            let local = event.local_date_time;
            let (Some(local_time), Some(utc_time)) = (local.to_local(offset), local.to_utc(offset))
            else {
                return Err(DecodeError::InvalidDate {
                    year: local.year,
                    month: local.month,
                    day: local.day,
                }
                .into());
            };

            written += sqlx::query(
                "INSERT OR IGNORE INTO tidal_event (
                    id, station_id, station_code, local_date_time, utc_date_time, level, type
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(station_id)
            .bind(event.station_code.as_str())
            .bind(local_time.to_rfc3339())
            .bind(utc_time)
            .bind(event.level)
            .bind(event.kind.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Number of stored events of one station
    pub async fn count_tidal_events(&self, code: &StationCode) -> Result<i64, TideRecorderError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM tidal_event WHERE station_code = ?1")
            .bind(code.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close all connections
    pub async fn close(self) {
        self.pool.close().await;
    }
}
