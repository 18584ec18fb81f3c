//! Chain-level aggregates for the dashboard stat cards

use super::OptionContract;
use chrono::NaiveDate;
use serde::Serialize;

/// Summary statistics of a normalized dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChainStats {
    pub total_contracts: usize,
    pub calls: usize,
    pub puts: usize,
    /// Sum of open interest over contracts that reported one, saturating at `u64::MAX`
    pub total_open_interest: u64,
    /// Contracts whose open interest was absent upstream
    pub missing_open_interest: usize,
    pub min_strike: Option<f64>,
    pub max_strike: Option<f64>,
    pub nearest_expiration: Option<NaiveDate>,
    pub farthest_expiration: Option<NaiveDate>,
}

impl ChainStats {
    /// Aggregate over a dataset
    pub fn from_contracts(contracts: &[OptionContract]) -> Self {
        let mut stats = ChainStats {
            total_contracts: contracts.len(),
            ..Default::default()
        };

        for contract in contracts {
            if contract.is_call() {
                stats.calls += 1;
            } else {
                stats.puts += 1;
            }

            if contract.open_interest_reported {
                stats.total_open_interest =
                    stats.total_open_interest.saturating_add(contract.open_interest);
            } else {
                stats.missing_open_interest += 1;
            }

            let strike = contract.strike_price;
            stats.min_strike = Some(stats.min_strike.map_or(strike, |m| m.min(strike)));
            stats.max_strike = Some(stats.max_strike.map_or(strike, |m| m.max(strike)));

            let expiry = contract.expiration_date;
            stats.nearest_expiration = Some(stats.nearest_expiration.map_or(expiry, |e| e.min(expiry)));
            stats.farthest_expiration =
                Some(stats.farthest_expiration.map_or(expiry, |e| e.max(expiry)));
        }

        stats
    }

    /// Share of contracts that reported open interest, in [0, 1]
    pub fn open_interest_coverage(&self) -> f64 {
        if self.total_contracts == 0 {
            return 0.0;
        }
        (self.total_contracts - self.missing_open_interest) as f64 / self.total_contracts as f64
    }
}
