//! Categorical color scale for contract types

use crate::chain::ContractType;
use serde::{Deserialize, Serialize};

/// Default fill for calls
pub const CALL_COLOR: &str = "#3B82F6";
/// Default fill for puts
pub const PUT_COLOR: &str = "#EF4444";

/// Fixed mapping from contract type to fill color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScale {
    pub call: String,
    pub put: String,
}

impl ColorScale {
    pub fn new(call: impl Into<String>, put: impl Into<String>) -> Self {
        Self {
            call: call.into(),
            put: put.into(),
        }
    }

    pub fn map(&self, contract_type: ContractType) -> &str {
        match contract_type {
            ContractType::Call => &self.call,
            ContractType::Put => &self.put,
        }
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::new(CALL_COLOR, PUT_COLOR)
    }
}
