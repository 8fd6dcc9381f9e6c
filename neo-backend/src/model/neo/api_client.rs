///! NASA NeoWs client for feed and lookup requests
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::error::NeoError;
use super::parser::{parse_feed_json, parse_neo_json};
use super::types::{FeedResult, NearEarthObject};

pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov/neo/rest/v1";
const USER_AGENT: &str = "Mozilla/5.0 neo-backend/0.1";

/// Supplier of raw feed and lookup data.
///
/// No retries and no timeout policy live above this trait; implementations
/// own both.
#[async_trait]
pub trait NeoSource: Send + Sync {
    /// Fetch every object with a close approach in `start..=end`
    async fn fetch_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<FeedResult, NeoError>;

    /// Fetch one object by identifier
    async fn lookup(&self, id: &str) -> Result<NearEarthObject, NeoError>;

    /// Source name for logging
    fn source_name(&self) -> &'static str;
}

/// reqwest-backed [`NeoSource`] for the NeoWs REST API
pub struct NasaNeoClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NasaNeoClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn feed_url(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/feed?start_date={}&end_date={}&api_key={}",
            self.base_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            urlencoding::encode(&self.api_key)
        )
    }

    fn lookup_url(&self, id: &str) -> String {
        format!(
            "{}/neo/{}?api_key={}",
            self.base_url,
            urlencoding::encode(id),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl NeoSource for NasaNeoClient {
    async fn fetch_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<FeedResult, NeoError> {
        tracing::debug!("Requesting NEO feed {} .. {}", start, end);

        let response = self
            .client
            .get(self.feed_url(start, end))
            .send()
            .await
            .map_err(|e| NeoError::Ingestion(format!("Failed to fetch data: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NeoError::Ingestion(format!(
                "Failed to fetch data (HTTP {})",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NeoError::Ingestion(format!("Failed to read feed response: {}", e)))?;

        parse_feed_json(&body)
    }

    async fn lookup(&self, id: &str) -> Result<NearEarthObject, NeoError> {
        tracing::debug!("Looking up NEO {}", id);

        let response = self
            .client
            .get(self.lookup_url(id))
            .send()
            .await
            .map_err(|e| NeoError::Lookup(format!("Failed to look up asteroid {}: {}", id, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(NeoError::Lookup(format!("Asteroid not found: {}", id)));
        }
        if !status.is_success() {
            return Err(NeoError::Lookup(format!(
                "Asteroid lookup for {} failed (HTTP {})",
                id, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NeoError::Lookup(format!("Failed to read lookup response: {}", e)))?;

        parse_neo_json(&body)
    }

    fn source_name(&self) -> &'static str {
        "nasa-neows"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NasaNeoClient {
        NasaNeoClient::new("https://api.nasa.gov/neo/rest/v1/", "DEMO_KEY", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_feed_url() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        assert_eq!(
            client().feed_url(start, end),
            "https://api.nasa.gov/neo/rest/v1/feed?start_date=2024-01-15&end_date=2024-01-21&api_key=DEMO_KEY"
        );
    }

    #[test]
    fn test_lookup_url_encodes_id() {
        assert_eq!(
            client().lookup_url("3542519"),
            "https://api.nasa.gov/neo/rest/v1/neo/3542519?api_key=DEMO_KEY"
        );
        assert_eq!(
            client().lookup_url("a/b c"),
            "https://api.nasa.gov/neo/rest/v1/neo/a%2Fb%20c?api_key=DEMO_KEY"
        );
    }

    #[tokio::test]
    #[ignore] // Requires network connection
    async fn test_fetch_today_feed() {
        let today = chrono::Utc::now().date_naive();
        let result = client().fetch_feed(today, today).await;
        assert!(result.is_ok() || result.is_err());
    }

    #[tokio::test]
    #[ignore]
    async fn test_lookup_unknown_id() {
        let result = client().lookup("0").await;
        assert!(matches!(result, Err(NeoError::Lookup(_))));
    }
}
