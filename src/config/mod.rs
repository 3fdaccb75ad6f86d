//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional)  → process environment
//! environment           → RPC_URL, CONTRACT_ADDRESS, PRIVATE_KEY
//! TOML file (optional)  → [transaction] tuning
//! CLI flags             → TransactionOverrides
//!     → loader.rs (merge sources)
//!     → validation.rs (semantic checks, all errors at once)
//!     → ClientConfig (validated, immutable, passed explicitly)
//! ```
//!
//! # Design Decisions
//! - Resolved once, before any network activity
//! - The private key is only ever read from the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{resolve_config, ConfigError, ConfigSources};
pub use schema::{ClientConfig, TransactionConfig, TransactionOverrides};
