//! Options chain module
//!
//! Canonical contract records, the raw upstream payload, record
//! normalization and chain-level statistics.

mod normalize;
mod stats;
mod types;

pub use normalize::{normalize_payload, normalize_results, DropReason, Normalized};
pub use stats::ChainStats;
pub use types::{ContractType, Greeks, OptionContract, OptionsChainResponse};
