//! Station directory page
//!
//! The directory is a single HTML table. After the header row, each data row
//! holds at least five cells in order: JMA id, station code, name, latitude
//! and longitude.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{coordinate, RowFailure};
use crate::{
    errors::DecodeError,
    models::{StationCode, StationRecord},
};

const REQUIRED_CELLS: usize = 5;

/// Stations decoded from one directory page
#[derive(Debug, Clone, Default)]
pub struct DirectoryDecode {
    /// Accepted stations, in page order
    pub stations: Vec<StationRecord>,
    /// Data rows that were dropped
    pub rejected: Vec<RowFailure>,
}

/// Decoder for the station directory page
pub struct StationDirectoryDecoder {
    rows: Selector,
    cells: Selector,
}

impl Default for StationDirectoryDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StationDirectoryDecoder {
    pub fn new() -> Self {
        Self {
            rows: Selector::parse("table tr").expect("static row selector"),
            cells: Selector::parse("td").expect("static cell selector"),
        }
    }

    /// Decode every station row of the page.
    ///
    /// Rows with fewer than two cells are spacers and skipped without a report.
    /// Any other row that cannot be decoded, including one with a malformed
    /// coordinate or a repeated station code, is dropped and listed in
    /// [`DirectoryDecode::rejected`].
    pub fn decode(&self, html: &str) -> DirectoryDecode {
        let document = Html::parse_document(html);
        let mut result = DirectoryDecode::default();
        let mut seen_codes = HashSet::new();

        // Row 0 is the header
        for (index, row) in document.select(&self.rows).enumerate().skip(1) {
            let cells: Vec<String> = row.select(&self.cells).map(cell_text).collect();
            if cells.len() < 2 {
                debug!("Skipping non-data row {}", index);
                continue;
            }

            let station = decode_row(&cells).and_then(|station| {
                if seen_codes.insert(station.station_code.clone()) {
                    Ok(station)
                } else {
                    Err(DecodeError::MalformedDirectoryRow {
                        reason: format!("duplicate station code {}", station.station_code),
                    })
                }
            });

            match station {
                Ok(station) => result.stations.push(station),
                Err(error) => {
                    warn!("Rejected station directory row {}: {}", index, error);
                    result.rejected.push(RowFailure { line: index, error });
                }
            }
        }

        result
    }
}

/// Decode with a one-off decoder
pub fn decode(html: &str) -> DirectoryDecode {
    StationDirectoryDecoder::new().decode(html)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn decode_row(cells: &[String]) -> Result<StationRecord, DecodeError> {
    let [jma_id, code, name, latitude, longitude, ..] = cells else {
        return Err(DecodeError::MalformedDirectoryRow {
            reason: format!("expected {} cells, found {}", REQUIRED_CELLS, cells.len()),
        });
    };

    if jma_id.is_empty() {
        return Err(DecodeError::MalformedDirectoryRow {
            reason: "empty JMA id".to_string(),
        });
    }

    Ok(StationRecord {
        id: Uuid::new_v4(),
        jma_id: jma_id.clone(),
        station_code: StationCode::try_from(code.as_str())?,
        station_name: name.clone(),
        latitude: coordinate::decode_latitude(latitude)?,
        longitude: coordinate::decode(longitude)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body><table>
            <tr><th>番号</th><th>記号</th><th>地点名</th><th>緯度</th><th>経度</th></tr>
            {rows}
            </table></body></html>"#
        )
    }

    #[test]
    fn decodes_rows_in_order() {
        let html = page(
            r#"<tr><td>0012</td><td>WN</td><td>稚内</td><td>45゜24'</td><td>141゜41'</td></tr>
               <tr><td> 0150 </td><td> TK </td><td> 東京 </td><td>35゜39.0'</td><td>139゜46.2'</td></tr>"#,
        );

        let result = decode(&html);

        assert!(result.rejected.is_empty());
        assert_eq!(result.stations.len(), 2);

        let first = &result.stations[0];
        assert_eq!(first.jma_id, "0012");
        assert_eq!(first.station_code.as_str(), "WN");
        assert_eq!(first.station_name, "稚内");
        assert_eq!(first.latitude.degrees, 45);
        assert_eq!(first.longitude.minutes, 41.0);

        let second = &result.stations[1];
        assert_eq!(second.jma_id, "0150");
        assert_eq!(second.station_code.as_str(), "TK");
        assert_eq!(second.station_name, "東京");
        assert!((second.longitude.minutes - 46.2).abs() < 1e-9);

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn header_with_td_cells_is_skipped() {
        let html = r#"<table>
            <tr><td>id</td><td>code</td><td>name</td><td>lat</td><td>lon</td></tr>
            <tr><td>1</td><td>D8</td><td>Hakodate</td><td>41゜47'</td><td>140゜43'</td></tr>
        </table>"#;

        let result = decode(html);
        assert_eq!(result.stations.len(), 1);
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn spacer_rows_are_skipped_silently() {
        let html = page(
            r#"<tr><td colspan="5">北海道</td></tr>
               <tr></tr>
               <tr><td>1</td><td>D8</td><td>Hakodate</td><td>41゜47'</td><td>140゜43'</td></tr>"#,
        );

        let result = decode(&html);
        assert_eq!(result.stations.len(), 1);
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn short_rows_are_rejected() {
        let html = page(r#"<tr><td>1</td><td>D8</td><td>Hakodate</td></tr>"#);

        let result = decode(&html);
        assert!(result.stations.is_empty());
        assert_eq!(result.rejected.len(), 1);
        assert!(matches!(
            result.rejected[0].error,
            DecodeError::MalformedDirectoryRow { .. }
        ));
    }

    #[test]
    fn malformed_coordinate_drops_only_that_row() {
        let html = page(
            r#"<tr><td>1</td><td>D8</td><td>Hakodate</td><td>unknown</td><td>140゜43'</td></tr>
               <tr><td>2</td><td>TK</td><td>Tokyo</td><td>35゜39'</td><td>139゜46'</td></tr>"#,
        );

        let result = decode(&html);
        assert_eq!(result.stations.len(), 1);
        assert_eq!(result.stations[0].station_code.as_str(), "TK");
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].line, 1);
        assert!(matches!(
            result.rejected[0].error,
            DecodeError::MalformedCoordinate { .. }
        ));
    }

    #[test]
    fn swapped_coordinates_are_rejected() {
        let html = page(
            r#"<tr><td>1</td><td>D8</td><td>Hakodate</td><td>140゜43'</td><td>41゜47'</td></tr>"#,
        );

        let result = decode(&html);
        assert!(result.stations.is_empty());
        assert_eq!(result.rejected.len(), 1);
        assert!(matches!(
            result.rejected[0].error,
            DecodeError::MalformedCoordinate { .. }
        ));
    }

    #[test]
    fn duplicate_codes_keep_first() {
        let html = page(
            r#"<tr><td>1</td><td>D8</td><td>Hakodate</td><td>41゜47'</td><td>140゜43'</td></tr>
               <tr><td>2</td><td>D8</td><td>Again</td><td>41゜47'</td><td>140゜43'</td></tr>"#,
        );

        let result = decode(&html);
        assert_eq!(result.stations.len(), 1);
        assert_eq!(result.stations[0].station_name, "Hakodate");
        assert_eq!(result.rejected.len(), 1);
    }

    #[test]
    fn invalid_station_code_is_rejected() {
        let html =
            page(r#"<tr><td>1</td><td>D-8</td><td>Hakodate</td><td>41゜47'</td><td>140゜43'</td></tr>"#);

        let result = decode(&html);
        assert!(result.stations.is_empty());
        assert_eq!(
            result.rejected[0].error,
            DecodeError::InvalidStationCode("D-8".to_string())
        );
    }

    #[test]
    fn empty_page_decodes_to_nothing() {
        let result = decode("<html><body><p>no table</p></body></html>");
        assert!(result.stations.is_empty());
        assert!(result.rejected.is_empty());
    }
}
