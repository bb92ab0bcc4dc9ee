//! Decoders for JMA station directory pages and tide tables.
//!
//! All decoders are pure and synchronous. Failures are isolated per row and
//! returned next to the accepted records, so a caller can see exactly which
//! input lines were dropped.

pub mod coordinate;
pub mod layout;
pub mod station_directory;
pub mod tide_row;
pub mod tide_table;

use crate::errors::DecodeError;

pub use station_directory::{DirectoryDecode, StationDirectoryDecoder};
pub use tide_row::{DecodedRow, TideRowDecoder};
pub use tide_table::{TideTable, TideTableDecoder};

/// Input row that was excluded from a decode result
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// 1-based line number for tide tables, row index for directory tables
    pub line: usize,
    pub error: DecodeError,
}
