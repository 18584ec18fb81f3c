//! Options reference API module
//!
//! Client for the upstream options contracts endpoint and the
//! [`OptionsSource`] seam the fetch orchestrator is written against.

mod client;

pub use client::{
    usable_api_key, PolygonClient, PolygonConfig, API_KEY_PLACEHOLDER, POLYGON_API_URL,
};

use crate::chain::OptionsChainResponse;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Ticker used when none is configured
pub const DEFAULT_TICKER: &str = "AAPL";

/// What to ask the upstream for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainQuery {
    /// Underlying symbol, e.g. "AAPL"
    pub underlying_ticker: String,
    /// Restrict to a single expiration
    pub expiration_date: Option<NaiveDate>,
}

impl ChainQuery {
    pub fn new(underlying_ticker: impl Into<String>) -> Self {
        Self {
            underlying_ticker: underlying_ticker.into(),
            expiration_date: None,
        }
    }

    pub fn with_expiration(mut self, expiration_date: NaiveDate) -> Self {
        self.expiration_date = Some(expiration_date);
        self
    }
}

impl Default for ChainQuery {
    fn default() -> Self {
        Self::new(DEFAULT_TICKER)
    }
}

/// Fetch-path failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Credential absent or placeholder; retrying will not help
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-success HTTP status
    #[error("HTTP error! status: {status} - {body}")]
    Transport { status: u16, body: String },

    /// Connection, timeout or other I/O failure
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP succeeded but the payload's status is not "OK"
    #[error("API error: {0}")]
    UpstreamStatus(String),

    /// Body is not JSON
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// True if a manual retry can succeed without fixing setup
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Configuration(_))
    }
}

/// A provider of options chain pages
#[async_trait]
pub trait OptionsSource: Send + Sync {
    /// Fetch the first page of contracts for a query
    async fn fetch_chain(&self, query: &ChainQuery) -> Result<OptionsChainResponse, FetchError>;
}
