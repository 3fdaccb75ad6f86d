//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

use crate::config::loader::ConfigError;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Failure of a single request against the ledger node.
#[derive(Debug, Error)]
pub enum NodeError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Response could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Result type for single node requests.
pub type NodeResult<T> = Result<T, NodeError>;

/// Errors that can occur while driving the storage contract.
///
/// Every variant is terminal for the run.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Required configuration is absent or malformed.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Dialing or probing the node failed.
    #[error("failed to connect to {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: NodeError,
    },

    /// The contract could not be bound at the given address.
    #[error("cannot bind contract at {address}: {reason}")]
    Binding { address: Address, reason: String },

    /// A read-only contract call failed.
    #[error("call to {method}() failed: {source}")]
    Call {
        method: &'static str,
        #[source]
        source: NodeError,
    },

    /// Invalid private key or failed nonce/chain lookup.
    #[error("authorization error: {0}")]
    Authorization(String),

    /// The node could not simulate the call.
    #[error("gas estimation for {method}() failed: {source}")]
    Estimation {
        method: &'static str,
        #[source]
        source: NodeError,
    },

    /// Signing or broadcasting failed.
    #[error("submitting {method}() failed: {reason}")]
    Submission { method: &'static str, reason: String },

    /// Transaction was not confirmed.
    #[error("transaction {tx_hash} not confirmed: {reason}")]
    Confirmation { tx_hash: TxHash, reason: String },

    /// Transaction was reverted on-chain.
    #[error("transaction {tx_hash} reverted in block {}", block_label(.block_number))]
    Reverted {
        tx_hash: TxHash,
        block_number: Option<u64>,
    },
}

impl BlockchainError {
    /// Name of the orchestration step that produced this error.
    pub fn step(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "resolve_config",
            Self::Connection { .. } => "connect",
            Self::Binding { .. } => "bind_contract",
            Self::Call { .. } => "read_value",
            Self::Authorization(_) => "build_signing_identity",
            Self::Estimation { .. } => "estimate_gas",
            Self::Submission { .. } => "submit",
            Self::Confirmation { .. } | Self::Reverted { .. } => "wait_confirmed",
        }
    }

    /// Transaction hash the error refers to, if any.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Confirmation { tx_hash, .. } | Self::Reverted { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}

fn block_label(block_number: &Option<u64>) -> String {
    block_number.map_or_else(|| "unknown".to_string(), |b| b.to_string())
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Receipt of a mined transaction, as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    /// `true` when execution succeeded.
    pub status: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}
