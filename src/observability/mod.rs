//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config, blockchain, orchestrator
//!     → tracing macros with structured fields
//!     → logging.rs (EnvFilter + fmt layer on stderr)
//! ```

pub mod logging;
