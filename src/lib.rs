//! Tide recorder
//!
//! Decodes Japan Meteorological Agency tide data, the HTML station directory
//! and the fixed-width annual tide tables, into typed records and stores them
//! in SQLite.

pub mod config;
pub mod database;
pub mod decode;
pub mod errors;
pub mod fetch;
pub mod models;

pub use errors::{DecodeError, TideRecorderError};
