//! Options chain types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Option contract type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Call,
    Put,
}

impl ContractType {
    /// Parse the upstream wire value. Only the exact lowercase strings are accepted.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "call" => Some(ContractType::Call),
            "put" => Some(ContractType::Put),
            _ => None,
        }
    }

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Call => "call",
            ContractType::Put => "put",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sensitivity metrics carried through untouched when the upstream supplies them
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub implied_volatility: Option<f64>,
    pub gamma: Option<f64>,
    pub delta: Option<f64>,
    pub theta: Option<f64>,
    pub vega: Option<f64>,
}

impl Greeks {
    /// True if no metric is present
    pub fn is_empty(&self) -> bool {
        self.implied_volatility.is_none()
            && self.gamma.is_none()
            && self.delta.is_none()
            && self.theta.is_none()
            && self.vega.is_none()
    }
}

/// A normalized options contract
///
/// Invariants: `strike_price > 0` and finite, `expiration_date` is a valid
/// calendar date. `open_interest` is zero when the upstream omitted it;
/// `open_interest_reported` distinguishes that case from a genuine zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Underlying symbol (e.g., "AAPL")
    pub underlying_ticker: String,
    /// Call or put
    pub contract_type: ContractType,
    /// Expiration date
    pub expiration_date: NaiveDate,
    /// Exercise price
    pub strike_price: f64,
    /// Outstanding contracts, 0 when absent upstream
    pub open_interest: u64,
    /// Whether the upstream actually reported an open interest value
    pub open_interest_reported: bool,
    /// Contract identifier (e.g., "O:AAPL250620C00150000")
    pub ticker: String,
    /// Optional greeks
    #[serde(default)]
    pub greeks: Greeks,
}

impl OptionContract {
    pub fn is_call(&self) -> bool {
        self.contract_type == ContractType::Call
    }

    pub fn is_put(&self) -> bool {
        self.contract_type == ContractType::Put
    }
}

/// Response body of the options reference contracts endpoint
///
/// `results` is kept loosely typed so that one malformed record never
/// fails the whole page; records are validated by the normalizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionsChainResponse {
    /// "OK" on success
    #[serde(default)]
    pub status: String,
    /// Raw contract records
    #[serde(default)]
    pub results: Option<Vec<serde_json::Value>>,
    /// Number of results in this page
    #[serde(default)]
    pub count: Option<u64>,
    /// Next page cursor, never followed
    #[serde(default)]
    pub next_url: Option<String>,
    /// Upstream request identifier
    #[serde(default)]
    pub request_id: Option<String>,
}

impl OptionsChainResponse {
    /// Success sentinel for the `status` field
    pub const STATUS_OK: &'static str = "OK";

    pub fn is_ok(&self) -> bool {
        self.status == Self::STATUS_OK
    }

    /// Lenient extraction from an arbitrary JSON document.
    ///
    /// Fields of the wrong shape are treated as absent, so a body whose
    /// `results` is not an array reads as a page with no records.
    pub fn from_value(payload: &serde_json::Value) -> Self {
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };
        Self {
            status: text("status").unwrap_or_default(),
            results: payload
                .get("results")
                .and_then(serde_json::Value::as_array)
                .cloned(),
            count: payload.get("count").and_then(serde_json::Value::as_u64),
            next_url: text("next_url"),
            request_id: text("request_id"),
        }
    }
}
