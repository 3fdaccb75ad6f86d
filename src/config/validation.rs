//! Configuration validation.
//!
//! # Responsibilities
//! - Check that every required variable is present and well-formed
//! - Validate value ranges (timeouts and poll interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation turns a `RawClientConfig` into a `ClientConfig`

use alloy::primitives::Address;
use url::Url;

use crate::config::loader::{CONTRACT_ADDRESS_VAR, PRIVATE_KEY_VAR, RPC_URL_VAR};
use crate::config::schema::{ClientConfig, RawClientConfig};

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required variable not set or empty.
    Missing(&'static str),
    InvalidUrl(String),
    UnsupportedScheme(String),
    InvalidAddress(String),
    /// The key is not 32 bytes of hex. The value is never echoed.
    InvalidPrivateKey,
    /// A duration field is zero.
    ZeroValue(&'static str),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Missing(var) => write!(f, "{} environment variable not set", var),
            ValidationError::InvalidUrl(reason) => write!(f, "{} is not a valid URL: {}", RPC_URL_VAR, reason),
            ValidationError::UnsupportedScheme(scheme) => {
                write!(f, "{} scheme '{}' is not one of http, https, ws, wss", RPC_URL_VAR, scheme)
            }
            ValidationError::InvalidAddress(reason) => {
                write!(f, "{} is not a 20-byte hex address: {}", CONTRACT_ADDRESS_VAR, reason)
            }
            ValidationError::InvalidPrivateKey => {
                write!(f, "{} must be 32 bytes of hex", PRIVATE_KEY_VAR)
            }
            ValidationError::ZeroValue(field) => write!(f, "{} must be greater than zero", field),
        }
    }
}

/// Validate raw configuration, collecting every problem.
pub fn validate_config(raw: &RawClientConfig) -> Result<ClientConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let rpc_url = match raw.rpc_url.as_deref() {
        None => {
            errors.push(ValidationError::Missing(RPC_URL_VAR));
            None
        }
        Some(s) => match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https" | "ws" | "wss") => Some(url),
            Ok(url) => {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
                None
            }
            Err(e) => {
                errors.push(ValidationError::InvalidUrl(e.to_string()));
                None
            }
        },
    };

    let contract_address = match raw.contract_address.as_deref() {
        None => {
            errors.push(ValidationError::Missing(CONTRACT_ADDRESS_VAR));
            None
        }
        Some(s) => match s.parse::<Address>() {
            Ok(address) => Some(address),
            Err(e) => {
                errors.push(ValidationError::InvalidAddress(e.to_string()));
                None
            }
        },
    };

    let private_key = match raw.private_key.as_deref() {
        None => {
            errors.push(ValidationError::Missing(PRIVATE_KEY_VAR));
            None
        }
        Some(key) if is_hex_key(key) => Some(key.to_string()),
        Some(_) => {
            errors.push(ValidationError::InvalidPrivateKey);
            None
        }
    };

    let tx = &raw.transaction;
    for (field, value) in [
        ("rpc_timeout_secs", tx.rpc_timeout_secs),
        ("confirmation_timeout_secs", tx.confirmation_timeout_secs),
        ("poll_interval_ms", tx.poll_interval_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroValue(field));
        }
    }

    match (rpc_url, contract_address, private_key) {
        (Some(rpc_url), Some(contract_address), Some(private_key)) if errors.is_empty() => Ok(ClientConfig {
            rpc_url,
            contract_address,
            private_key,
            transaction: raw.transaction.clone(),
        }),
        _ => Err(errors),
    }
}

fn is_hex_key(key: &str) -> bool {
    let hex = key.strip_prefix("0x").unwrap_or(key);
    hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}
