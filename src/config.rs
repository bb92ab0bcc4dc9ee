//! Application configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::FixedOffset;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_with::serde_as;
use tracing::warn;

use crate::{errors::TideRecorderError, models::utc_offset_from_hours};

pub const DEFAULT_STATION_URL: &str =
    "https://www.data.jma.go.jp/kaiyou/db/tide/suisan/station2025.php";
pub const DEFAULT_TIDE_TABLE_URL: &str =
    "https://www.data.jma.go.jp/kaiyou/data/db/tide/suisan/txt/{year}/{code}.txt";
/// Largest century base that keeps `century + 99` a four-digit year
pub const MAX_CENTURY: i32 = 9900;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub database: DatabaseConfig,
    pub decode: DecodeConfig,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Station directory page
    pub station_url: String,
    /// Tide table URL with `{year}` and `{code}` placeholders
    pub tide_table_url: String,
    pub year: i32,
    /// Station codes whose tide tables are fetched
    pub stations: Vec<String>,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub timeout: Duration,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DecodeConfig {
    /// Added to the two-digit year of tide table rows
    pub century: i32,
    /// Offset of the tide tables' local time from UTC
    pub utc_offset_hours: i32,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("fetch.station_url", DEFAULT_STATION_URL)?
            .set_default("fetch.tide_table_url", DEFAULT_TIDE_TABLE_URL)?
            .set_default("fetch.year", 2025)?
            .set_default("fetch.stations", Vec::<String>::new())?
            .set_default("fetch.timeout", 30)?
            .set_default("database.path", "db/tidal_data.db")?
            .set_default("decode.century", 2000)?
            .set_default("decode.utc_offset_hours", 9)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("TIDERECORDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("fetch.stations"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<(), TideRecorderError> {
        self.fetch.validate()?;
        self.database.validate()?;
        self.decode.validate()?;
        Ok(())
    }
}

fn configuration_error(message: impl Into<String>) -> TideRecorderError {
    TideRecorderError::ConfigurationError {
        message: message.into(),
    }
}

impl FetchConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), TideRecorderError> {
        if self.station_url.trim().is_empty() {
            return Err(configuration_error("Station URL cannot be empty"));
        }
        for placeholder in ["{year}", "{code}"] {
            if !self.tide_table_url.contains(placeholder) {
                return Err(configuration_error(format!(
                    "Tide table URL must contain {}",
                    placeholder
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(configuration_error("Timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Tide table URL for one station and year
    pub fn tide_table_url_for(&self, code: &str, year: i32) -> String {
        self.tide_table_url
            .replace("{year}", &year.to_string())
            .replace("{code}", code)
    }
}

impl DatabaseConfig {
    /// Validate configuration parameters, creating the database directory if needed
    pub fn validate(&self) -> Result<(), TideRecorderError> {
        self.validate_path()?;
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.ensure_directory_exists(dir)?;
        }
        Ok(())
    }

    fn validate_path(&self) -> Result<(), TideRecorderError> {
        if self.path.as_os_str().is_empty() {
            return Err(configuration_error("Database path cannot be empty"));
        }
        Ok(())
    }

    fn ensure_directory_exists(&self, dir: &Path) -> Result<(), TideRecorderError> {
        if !dir.exists() {
            warn!("Database directory does not exist, attempting to create it");
            std::fs::create_dir_all(dir).map_err(|e| {
                configuration_error(format!("Could not create database directory: {}", e))
            })?;
        }
        Ok(())
    }
}

impl DecodeConfig {
    pub fn validate(&self) -> Result<(), TideRecorderError> {
        if !(0..=MAX_CENTURY).contains(&self.century) || self.century % 100 != 0 {
            return Err(configuration_error(format!(
                "Century must be a multiple of 100 between 0 and {}",
                MAX_CENTURY
            )));
        }
        if !(-14..=14).contains(&self.utc_offset_hours) {
            return Err(configuration_error("UTC offset must be within ±14 hours"));
        }
        Ok(())
    }

    pub fn utc_offset(&self) -> Result<FixedOffset, TideRecorderError> {
        utc_offset_from_hours(self.utc_offset_hours)
            .ok_or_else(|| configuration_error("UTC offset out of range"))
    }
}
