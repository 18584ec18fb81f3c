//! Configuration types for options-scatter
//!
//! Loaded from a TOML file whose sections all default, then overlaid with
//! the process environment: `POLYGON_API_KEY` and `OPTIONS_TICKER` take
//! precedence over anything in the file.

use crate::polygon::{
    usable_api_key, PolygonConfig, API_KEY_PLACEHOLDER, DEFAULT_TICKER, POLYGON_API_URL,
};
use crate::scale::{ColorScale, Margins, Viewport, CALL_COLOR, PUT_COLOR};
use crate::telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "POLYGON_API_KEY";
/// Environment variable overriding the underlying ticker
pub const TICKER_ENV: &str = "OPTIONS_TICKER";

/// Accepted page sizes
pub const LIMIT_RANGE: std::ops::RangeInclusive<u32> = 50..=1000;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// True if the config file simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub chart: ChartConfig,
    pub telemetry: TelemetryConfig,
}

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the options reference API
    pub base_url: String,
    /// API credential; normally supplied through the environment
    pub api_key: Option<String>,
    /// Underlying symbol to chart
    pub ticker: String,
    /// Page size requested from the upstream
    pub limit: u32,
    /// Only request contracts that are still trading
    pub active: bool,
    /// Request timeout in seconds; unset leaves it to the HTTP stack
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: POLYGON_API_URL.to_string(),
            api_key: None,
            ticker: DEFAULT_TICKER.to_string(),
            limit: 1000,
            active: true,
            timeout_secs: None,
        }
    }
}

/// Chart surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub call_color: String,
    pub put_color: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margins: Margins::default(),
            call_color: CALL_COLOR.to_string(),
            put_color: PUT_COLOR.to_string(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Default filter; `RUST_LOG` wins when set
    pub log_level: String,
    pub log_format: LogFormat,
    /// Serve Prometheus metrics on this port when set
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from the environment.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`. Empty values are
    /// ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.api.api_key = Some(key);
        }
        if let Some(ticker) = non_empty(TICKER_ENV) {
            self.api.ticker = ticker.to_uppercase();
        }
    }

    /// Check ranges and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LIMIT_RANGE.contains(&self.api.limit) {
            return Err(ConfigError::Invalid(format!(
                "api.limit must be between {} and {}, got {}",
                LIMIT_RANGE.start(),
                LIMIT_RANGE.end(),
                self.api.limit
            )));
        }
        if self.api.ticker.trim().is_empty() {
            return Err(ConfigError::Invalid("api.ticker must not be empty".to_string()));
        }
        if !(self.chart.width > 0.0 && self.chart.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "chart dimensions must be positive, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }
        Ok(())
    }

    /// True if the client will accept the configured credential
    pub fn has_api_key(&self) -> bool {
        usable_api_key(self.api.api_key.as_deref()).is_some()
    }

    /// Credential suitable for display
    pub fn redacted_api_key(&self) -> String {
        match self.api.api_key.as_deref().map(str::trim) {
            None | Some("") => "<not set>".to_string(),
            Some(API_KEY_PLACEHOLDER) => "<placeholder>".to_string(),
            Some(key) if key.chars().count() > 4 => {
                let tail: String = key.chars().skip(key.chars().count() - 4).collect();
                format!("****{tail}")
            }
            Some(_) => "****".to_string(),
        }
    }

    pub fn polygon_config(&self) -> PolygonConfig {
        PolygonConfig {
            base_url: self.api.base_url.clone(),
            api_key: self.api.api_key.clone(),
            limit: self.api.limit,
            active: self.api.active,
            timeout: self.api.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.chart.width, self.chart.height).with_margins(self.chart.margins)
    }

    pub fn color_scale(&self) -> ColorScale {
        ColorScale::new(&self.chart.call_color, &self.chart.put_color)
    }
}
