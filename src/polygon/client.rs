//! HTTP client for the options contracts reference endpoint
//!
//! Only the first page of results is consumed; `next_url` is never followed.

use super::{ChainQuery, FetchError, OptionsSource};
use crate::chain::OptionsChainResponse;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Upstream base URL
pub const POLYGON_API_URL: &str = "https://api.polygon.io";

/// Value shipped in sample environment files; treated as no key at all
pub const API_KEY_PLACEHOLDER: &str = "your_polygon_api_key_here";

const CONTRACTS_PATH: &str = "/v3/reference/options/contracts";

/// Configuration for the options reference client
#[derive(Debug, Clone)]
pub struct PolygonConfig {
    /// Base URL for the API
    pub base_url: String,
    /// API credential
    pub api_key: Option<String>,
    /// Page size, 50..=1000
    pub limit: u32,
    /// Only list contracts that are still trading
    pub active: bool,
    /// Request timeout; `None` leaves it to the networking stack
    pub timeout: Option<Duration>,
}

impl Default for PolygonConfig {
    fn default() -> Self {
        Self {
            base_url: POLYGON_API_URL.to_string(),
            api_key: None,
            limit: 1000,
            active: true,
            timeout: None,
        }
    }
}

/// Stateless client for the options contracts endpoint
#[derive(Debug, Clone)]
pub struct PolygonClient {
    config: PolygonConfig,
    client: Client,
}

impl PolygonClient {
    /// Create a client with default configuration and the given key
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_config(PolygonConfig {
            api_key: Some(api_key.into()),
            ..Default::default()
        })
    }

    /// Create a client with custom configuration
    pub fn with_config(config: PolygonConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &PolygonConfig {
        &self.config
    }

    /// The configured key, or a configuration error if it is missing or
    /// still the placeholder
    fn credential(&self) -> Result<&str, FetchError> {
        usable_api_key(self.config.api_key.as_deref()).ok_or_else(|| {
            FetchError::Configuration(
                "Please set your Polygon.io API key (POLYGON_API_KEY)".to_string(),
            )
        })
    }

    fn query_params(&self, query: &ChainQuery, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("underlying_ticker", query.underlying_ticker.clone()),
            ("limit", self.config.limit.to_string()),
            ("active", self.config.active.to_string()),
        ];
        if let Some(date) = query.expiration_date {
            params.push(("expiration_date", date.format("%Y-%m-%d").to_string()));
        }
        params.push(("apikey", api_key.to_string()));
        params
    }
}

#[async_trait]
impl OptionsSource for PolygonClient {
    async fn fetch_chain(&self, query: &ChainQuery) -> Result<OptionsChainResponse, FetchError> {
        let api_key = self.credential()?;
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), CONTRACTS_PATH);

        tracing::debug!(
            url = %url,
            ticker = %query.underlying_ticker,
            limit = self.config.limit,
            expiration = ?query.expiration_date,
            "Requesting options contracts"
        );

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(query, api_key))
            .send()
            .await
            .map_err(|e| FetchError::Network(redact(&e.to_string(), api_key)))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Options contracts response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Options API error response");
            return Err(FetchError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(redact(&e.to_string(), api_key)))?;
        let payload: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        let chain = OptionsChainResponse::from_value(&payload);

        tracing::debug!(
            status = %chain.status,
            count = ?chain.count,
            results = chain.results.as_ref().map_or(0, Vec::len),
            has_next_page = chain.next_url.is_some(),
            "Decoded options chain page"
        );

        if !chain.is_ok() {
            return Err(FetchError::UpstreamStatus(chain.status));
        }

        Ok(chain)
    }
}

/// The trimmed key, unless it is empty or still the placeholder
pub fn usable_api_key(api_key: Option<&str>) -> Option<&str> {
    api_key
        .map(str::trim)
        .filter(|key| !key.is_empty() && *key != API_KEY_PLACEHOLDER)
}

/// Strip the credential from text that may embed the request URL
fn redact(text: &str, api_key: &str) -> String {
    text.replace(api_key, "API_KEY_HIDDEN")
}
