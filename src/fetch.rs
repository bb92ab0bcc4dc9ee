//! HTTP client for JMA tide pages

use tracing::info;

use crate::{config::FetchConfig, errors::TideRecorderError};

/// Client fetching the station directory and tide tables as whole documents
#[derive(Debug, Clone)]
pub struct JmaClient {
    client: reqwest::Client,
    config: FetchConfig,
}

impl JmaClient {
    /// Create a new client
    pub fn new(config: &FetchConfig) -> Result<Self, TideRecorderError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Fetch the station directory HTML
    pub async fn fetch_station_directory(&self) -> Result<String, TideRecorderError> {
        self.get_text(&self.config.station_url).await
    }

    /// Fetch the fixed-width tide table of one station
    pub async fn fetch_tide_table(&self, code: &str, year: i32) -> Result<String, TideRecorderError> {
        let url = self.config.tide_table_url_for(code, year);
        self.get_text(&url).await
    }

    async fn get_text(&self, url: &str) -> Result<String, TideRecorderError> {
        info!("Fetching {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
