//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! ClientConfig (RPC URL, contract address, private key)
//!     → client.rs (RPC connection with timeouts, implements node.rs)
//!     → contract.rs (SimpleStorage binding, get() reads)
//!     → wallet.rs (key loading, per-transaction signing identity)
//!     → transaction.rs (estimate, sign, broadcast, confirm)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod node;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use contract::{StorageCall, StorageContract};
pub use node::LedgerNode;
pub use types::{BlockchainError, BlockchainResult, ChainId, NodeError, NodeResult, TxReceipt};
pub use wallet::{SigningIdentity, Wallet};
