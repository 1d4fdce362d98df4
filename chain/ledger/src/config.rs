//! Ledger configuration
//!
//! Fixed at construction; there is no way to change a deployed ledger's
//! configuration.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::security::WithdrawPolicy;

/// Ledger configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Authorization rule for `withdraw_money`
    pub withdraw_policy: WithdrawPolicy,
}

impl LedgerConfig {
    /// Set the withdrawal authorization rule.
    pub fn with_withdraw_policy(mut self, policy: WithdrawPolicy) -> Self {
        self.withdraw_policy = policy;
        self
    }

    /// Load from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
