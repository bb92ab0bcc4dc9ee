//! Tide recorder utility

use chrono::FixedOffset;
use tide_recorder::{
    config::AppConfig,
    database::Database,
    decode::{StationDirectoryDecoder, TideRowDecoder, TideTableDecoder},
    errors::TideRecorderError,
    fetch::JmaClient,
};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), TideRecorderError> {
    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Defaults, then config/default.*, then TIDERECORDER__* environment variables
    let config = AppConfig::load()?;
    config.validate()?;

    let client = JmaClient::new(&config.fetch)?;
    let db = Database::open(&config.database).await?;

    let result = tokio::select! {
        result = run_tide_recorder(&config, &client, &db) => result,
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
            Ok(())
        }
    };

    match &result {
        Ok(()) => info!("Tide recorder completed"),
        Err(e) => error!("Tide recorder failed: {}", e),
    }

    db.close().await;
    result
}

async fn run_tide_recorder(
    config: &AppConfig,
    client: &JmaClient,
    db: &Database,
) -> Result<(), TideRecorderError> {
    let html = client.fetch_station_directory().await?;
    let directory = StationDirectoryDecoder::new().decode(&html);
    let written = db.insert_stations(&directory.stations).await?;
    info!(
        "Stored {} of {} stations, rejected {} rows",
        written,
        directory.stations.len(),
        directory.rejected.len()
    );

    let offset = config.decode.utc_offset()?;
    let decoder = TideTableDecoder::new(TideRowDecoder::new(config.decode.century));

    for code in &config.fetch.stations {
        if let Err(e) = record_station(client, db, &decoder, code, config.fetch.year, offset).await
        {
            error!("Failed to record tide table of station {}: {}", code, e);
        }
    }

    Ok(())
}

async fn record_station(
    client: &JmaClient,
    db: &Database,
    decoder: &TideTableDecoder,
    code: &str,
    year: i32,
    offset: FixedOffset,
) -> Result<(), TideRecorderError> {
    let text = client.fetch_tide_table(code, year).await?;
    let table = decoder.decode(&text);

    let hourly = db.insert_tidal_events(&table.hourly_levels, offset).await?;
    let extrema = db.insert_tidal_events(&table.extrema, offset).await?;
    info!(
        "Station {}: {} days, stored {} hourly levels and {} extrema, rejected {}",
        code,
        table.day_count(),
        hourly,
        extrema,
        table.rejected.len()
    );

    Ok(())
}
