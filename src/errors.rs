//! Errors for tide recorder
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TideRecorderError {
    #[error("HTTP request failed")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error")]
    ConfigError(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("IO error")]
    IoError(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("Failed to open database at {path}: {origin}")]
    DatabaseOpenError { path: PathBuf, origin: String },

    #[error("Failed to create table {table}: {origin}")]
    TableCreationError { table: String, origin: String },

    #[error("Failed to create index {index}: {origin}")]
    IndexCreationError { index: String, origin: String },

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),
}

/// Deterministic decode failures. None of these are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Malformed coordinate {text:?}: {reason}")]
    MalformedCoordinate { text: String, reason: &'static str },

    #[error("Malformed station directory row: {reason}")]
    MalformedDirectoryRow { reason: String },

    #[error("Malformed tide row, field {field}: {reason}")]
    MalformedTideRow { field: &'static str, reason: String },

    #[error("Invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Invalid time {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("Invalid station code {0:?}")]
    InvalidStationCode(String),
}
