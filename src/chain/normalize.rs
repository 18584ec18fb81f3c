//! Contract normalization
//!
//! Turns the loosely-typed records of an upstream page into canonical
//! [`OptionContract`]s. Normalization is pure and total: a malformed record
//! is dropped (and counted), never reported as an error, and a payload
//! without a `results` array yields an empty dataset.

use super::{ContractType, Greeks, OptionContract};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

/// Why a raw record was excluded from the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// Record is not a JSON object
    NotAnObject,
    /// Strike missing, non-numeric, non-finite or not strictly positive
    InvalidStrike,
    /// Expiration missing or not a parseable date
    InvalidExpiration,
    /// Contract type other than exactly "call" or "put"
    InvalidContractType,
}

/// Output of a normalization pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// Retained contracts, in upstream order
    pub contracts: Vec<OptionContract>,
    /// Index of each dropped record in the raw sequence and why it was dropped
    pub dropped: Vec<(usize, DropReason)>,
}

impl Normalized {
    /// Number of retained contracts whose open interest was defaulted
    pub fn defaulted_open_interest(&self) -> usize {
        self.contracts
            .iter()
            .filter(|c| !c.open_interest_reported)
            .count()
    }
}

/// Normalize a whole response body.
///
/// A body that is not an object, or has no `results` array, is treated as
/// an empty page.
pub fn normalize_payload(payload: &Value) -> Normalized {
    match payload.get("results").and_then(Value::as_array) {
        Some(results) => normalize_results(results),
        None => Normalized::default(),
    }
}

/// Normalize a sequence of raw contract records
pub fn normalize_results(results: &[Value]) -> Normalized {
    let mut normalized = Normalized {
        contracts: Vec::with_capacity(results.len()),
        dropped: Vec::new(),
    };

    for (index, raw) in results.iter().enumerate() {
        match normalize_record(raw) {
            Ok(contract) => normalized.contracts.push(contract),
            Err(reason) => normalized.dropped.push((index, reason)),
        }
    }

    normalized
}

fn normalize_record(raw: &Value) -> Result<OptionContract, DropReason> {
    let record = raw.as_object().ok_or(DropReason::NotAnObject)?;

    let strike_price = record
        .get("strike_price")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite() && *s > 0.0)
        .ok_or(DropReason::InvalidStrike)?;

    let expiration_date = record
        .get("expiration_date")
        .and_then(Value::as_str)
        .and_then(parse_expiration)
        .ok_or(DropReason::InvalidExpiration)?;

    let contract_type = record
        .get("contract_type")
        .and_then(Value::as_str)
        .and_then(ContractType::from_wire)
        .ok_or(DropReason::InvalidContractType)?;

    let open_interest = record.get("open_interest").and_then(parse_open_interest);

    Ok(OptionContract {
        underlying_ticker: string_field(record, "underlying_ticker"),
        contract_type,
        expiration_date,
        strike_price,
        open_interest: open_interest.unwrap_or(0),
        open_interest_reported: open_interest.is_some(),
        ticker: string_field(record, "ticker"),
        greeks: parse_greeks(record),
    })
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part is kept)
fn parse_expiration(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Non-negative numeric open interest; fractional values are truncated
fn parse_open_interest(value: &Value) -> Option<u64> {
    if let Some(oi) = value.as_u64() {
        return Some(oi);
    }
    value
        .as_f64()
        .filter(|oi| oi.is_finite() && *oi >= 0.0)
        .map(|oi| oi.trunc() as u64)
}

fn string_field(record: &Map<String, Value>, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Greeks may sit at the top level or inside a nested `greeks` object
fn parse_greeks(record: &Map<String, Value>) -> Greeks {
    let nested = record.get("greeks").and_then(Value::as_object);
    let metric = |key: &str| {
        record
            .get(key)
            .and_then(Value::as_f64)
            .or_else(|| nested.and_then(|g| g.get(key)).and_then(Value::as_f64))
            .filter(|v| v.is_finite())
    };

    Greeks {
        implied_volatility: metric("implied_volatility"),
        gamma: metric("gamma"),
        delta: metric("delta"),
        theta: metric("theta"),
        vega: metric("vega"),
    }
}
