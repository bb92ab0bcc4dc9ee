use chrono::FixedOffset;
use tempfile::tempdir;

use tide_recorder::{
    config::DatabaseConfig,
    database::Database,
    decode::{station_directory, tide_table},
    models::{StationCode, JST_OFFSET_SECONDS},
    TideRecorderError,
};

const DIRECTORY: &str = r#"<html><body><table>
<tr><th>番号</th><th>記号</th><th>地点名</th><th>緯度</th><th>経度</th></tr>
<tr><td>0106</td><td>D8</td><td>函館</td><td>41゜47'</td><td>140゜43'</td></tr>
<tr><td>0150</td><td>TK</td><td>東京</td><td>35゜39'</td><td>139゜46'</td></tr>
</table></body></html>"#;

fn tide_row(code: &str, day: u32) -> String {
    let hourly: String = (0..24).map(|h| format!("{:>3}", 100 + h)).collect();
    format!("{hourly}25 1{day:>2}{code} 514 621725 98999999999999991112 -32350  599999999999999")
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECONDS).unwrap()
}

#[tokio::test]
async fn test_store_directory_and_table() -> Result<(), TideRecorderError> {
    let temp_dir = tempdir().unwrap();
    let config = DatabaseConfig {
        path: temp_dir.path().join("db").join("tidal_data.db"),
    };
    let db = Database::open(&config).await?;

    let directory = station_directory::decode(DIRECTORY);
    assert_eq!(db.insert_stations(&directory.stations).await?, 2);

    let table = tide_table::decode(&format!("{}\n{}\n", tide_row("D8", 1), tide_row("D8", 2)));
    assert!(table.rejected.is_empty());
    assert_eq!(db.insert_tidal_events(&table.hourly_levels, jst()).await?, 48);
    assert_eq!(db.insert_tidal_events(&table.extrema, jst()).await?, 8);

    let d8 = StationCode::try_from("D8").unwrap();
    assert_eq!(db.count_tidal_events(&d8).await?, 56);

    // Every event references the stored station
    let station_id = db.station_id(&d8).await?.unwrap();
    let linked: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tidal_event WHERE station_id = ?1")
        .bind(station_id.to_string())
        .fetch_one(db.pool())
        .await?;
    assert_eq!(linked, 56);

    db.close().await;
    Ok(())
}

#[tokio::test]
async fn test_reopen_keeps_data() -> Result<(), TideRecorderError> {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("tidal_data.db");

    let db = Database::from_path(&path).await?;
    let directory = station_directory::decode(DIRECTORY);
    db.insert_stations(&directory.stations).await?;
    db.close().await;

    let db = Database::from_path(&path).await?;
    let stations = db.get_stations().await?;
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].station_code.as_str(), "D8");
    assert_eq!(stations[0].jma_id, "0106");
    assert_eq!(stations[1].station_name, "東京");
    db.close().await;
    Ok(())
}

#[tokio::test]
async fn test_extremum_times_are_stored_in_utc() -> Result<(), TideRecorderError> {
    let db = Database::from_url("sqlite::memory:").await?;
    let table = tide_table::decode(&tide_row("TK", 1));
    db.insert_tidal_events(&table.extrema, jst()).await?;

    let times: Vec<(String, String)> = sqlx::query_as(
        "SELECT local_date_time, utc_date_time FROM tidal_event
        WHERE type = 'high' ORDER BY utc_date_time",
    )
    .fetch_all(db.pool())
    .await?;

    assert_eq!(times.len(), 2);
    assert_eq!(times[0].0, "2025-01-01T05:14:00+09:00");
    assert!(times[0].1.starts_with("2024-12-31T20:14:00"));
    assert_eq!(times[1].0, "2025-01-01T17:25:00+09:00");
    assert!(times[1].1.starts_with("2025-01-01T08:25:00"));
    Ok(())
}
