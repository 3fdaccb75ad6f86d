//! Configuration schema definitions.
//!
//! Connection settings come from the environment; run tuning comes from an
//! optional TOML file and command-line overrides.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Root of the optional TOML tuning file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// Transaction and timing settings.
    pub transaction: TransactionConfig,
}

/// Transaction and timing settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TransactionConfig {
    /// Bound for the dial and for each RPC request, in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum wait for a transaction receipt, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Delay between receipt queries, in milliseconds.
    pub poll_interval_ms: u64,

    /// Value passed to `set`.
    pub set_value: u64,

    /// Value passed to `add`.
    pub add_value: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 1000,
            set_value: 150,
            add_value: 10,
        }
    }
}

impl TransactionConfig {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn set_value(&self) -> U256 {
        U256::from(self.set_value)
    }

    pub fn add_value(&self) -> U256 {
        U256::from(self.add_value)
    }
}

/// Command-line overrides for [`TransactionConfig`].
#[derive(Debug, Clone, Default)]
pub struct TransactionOverrides {
    pub rpc_timeout_secs: Option<u64>,
    pub confirmation_timeout_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub set_value: Option<u64>,
    pub add_value: Option<u64>,
}

impl TransactionOverrides {
    /// Overwrite every field that was given.
    pub fn apply(&self, config: &mut TransactionConfig) {
        if let Some(v) = self.rpc_timeout_secs {
            config.rpc_timeout_secs = v;
        }
        if let Some(v) = self.confirmation_timeout_secs {
            config.confirmation_timeout_secs = v;
        }
        if let Some(v) = self.poll_interval_ms {
            config.poll_interval_ms = v;
        }
        if let Some(v) = self.set_value {
            config.set_value = v;
        }
        if let Some(v) = self.add_value {
            config.add_value = v;
        }
    }
}

/// Configuration as read, before validation.
#[derive(Clone, Default)]
pub struct RawClientConfig {
    pub rpc_url: Option<String>,
    pub contract_address: Option<String>,
    pub private_key: Option<String>,
    pub transaction: TransactionConfig,
}

/// Validated configuration for one run.
#[derive(Clone)]
pub struct ClientConfig {
    /// Ledger node endpoint.
    pub rpc_url: Url,

    /// Address of the deployed storage contract.
    pub contract_address: Address,

    /// Hex-encoded signing key. Never logged.
    pub private_key: String,

    pub transaction: TransactionConfig,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("contract_address", &self.contract_address)
            .field("private_key", &"<redacted>")
            .field("transaction", &self.transaction)
            .finish()
    }
}

impl std::fmt::Debug for RawClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawClientConfig")
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("transaction", &self.transaction)
            .finish()
    }
}
