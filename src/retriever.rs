//! Test data retrieval over HTTP.
//!
//! One `GET <base>/test-requests/<id>/details` per call, normalized into a
//! [`TestDataBundle`]. Transport, status and body errors propagate as
//! [`Error::FetchError`]; malformed embedded JSON does not.

use crate::bundle::TestDataBundle;
use crate::{ClientConfig, Error, Result};
use reqwest::Client;
use std::fmt::Display;
use std::time::Duration;

/// Fetches test details from the lab backend
#[derive(Debug, Clone)]
pub struct TestDataRetriever {
    client: Client,
    config: ClientConfig,
}

impl TestDataRetriever {
    /// Build a retriever. Fails only if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        if !config.headers.is_empty() {
            builder = builder.default_headers(header_map(&config)?);
        }
        let client = builder
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch and normalize the details of one test request
    pub async fn fetch_complete_test_data(&self, test_request_id: impl Display) -> Result<TestDataBundle> {
        let id = test_request_id.to_string();
        log::info!("Fetching complete test data for ID: {}", id);

        let raw = self.fetch_details(&id).await.map_err(|e| {
            log::error!("Error fetching complete test data: {}", e);
            Error::FetchError(e.to_string())
        })?;

        log::debug!("Raw data from backend: {}", raw);
        Ok(TestDataBundle::from_response(raw))
    }

    async fn fetch_details(&self, test_request_id: &str) -> reqwest::Result<serde_json::Value> {
        let url = self.config.api.test_details_url(test_request_id);
        self.client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await
    }
}

fn header_map(config: &ClientConfig) -> Result<reqwest::header::HeaderMap> {
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

    let mut map = HeaderMap::new();
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::ConfigError(format!("Invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::ConfigError(format!("Invalid header value for {}: {}", name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}
