//! Client for a deployed `SimpleStorage` contract.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod orchestrator;

pub use blockchain::{BlockchainClient, BlockchainError, LedgerNode};
pub use config::ClientConfig;
pub use orchestrator::{execute, Orchestrator, RunReport};
