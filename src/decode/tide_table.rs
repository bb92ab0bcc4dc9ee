//! Annual tide table of one station, one row per day

use tracing::warn;

use super::{layout::HOURS, tide_row::TideRowDecoder, RowFailure};
use crate::models::TidalEvent;

/// Events decoded from a tide table
#[derive(Debug, Clone, Default)]
pub struct TideTable {
    /// 24 events per accepted row, rows in input order, hours ascending
    pub hourly_levels: Vec<TidalEvent>,
    /// High then low tides per accepted row, rows in input order
    pub extrema: Vec<TidalEvent>,
    /// Rows that contributed no events, plus extremum slots that were dropped
    pub rejected: Vec<RowFailure>,
}

impl TideTable {
    /// Number of rows that contributed events
    pub fn day_count(&self) -> usize {
        self.hourly_levels.len() / HOURS
    }
}

/// Decoder for whole tide tables
#[derive(Debug, Clone, Copy, Default)]
pub struct TideTableDecoder {
    rows: TideRowDecoder,
}

impl TideTableDecoder {
    pub fn new(rows: TideRowDecoder) -> Self {
        Self { rows }
    }

    /// Decode every non-empty line. A bad line never stops the decode.
    ///
    /// Lines holding only spaces are decoded like any other and end up in
    /// [`TideTable::rejected`].
    pub fn decode(&self, table: &str) -> TideTable {
        let mut result = TideTable::default();

        for (index, line) in table.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let line_number = index + 1;

            match self.rows.decode(line) {
                Ok(row) => {
                    result.hourly_levels.extend(row.hourly_events());
                    result.extrema.extend(row.extremum_events());
                    for error in row.slot_failures {
                        warn!("Dropped extremum on tide table line {}: {}", line_number, error);
                        result.rejected.push(RowFailure {
                            line: line_number,
                            error,
                        });
                    }
                }
                Err(error) => {
                    warn!("Rejected tide table line {}: {}", line_number, error);
                    result.rejected.push(RowFailure {
                        line: line_number,
                        error,
                    });
                }
            }
        }

        result
    }
}

/// Decode with the default century
pub fn decode(table: &str) -> TideTable {
    TideTableDecoder::default().decode(table)
}
