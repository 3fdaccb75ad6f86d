//! Configuration loading from the environment and disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{ClientConfig, FileConfig, RawClientConfig, TransactionOverrides};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the node endpoint.
pub const RPC_URL_VAR: &str = "RPC_URL";
/// Environment variable holding the storage contract address.
pub const CONTRACT_ADDRESS_VAR: &str = "CONTRACT_ADDRESS";
/// Environment variable holding the signing key.
pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Env(dotenvy::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "IO error reading {}: {}", path.display(), source),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env(e) => write!(f, "Error loading .env file: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where configuration beyond the environment comes from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Optional TOML tuning file.
    pub file: Option<PathBuf>,
    /// Command-line overrides, applied after the file.
    pub overrides: TransactionOverrides,
}

/// Default `.env` location, relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Load a `.env` file into the process environment.
///
/// An explicit `path` must exist. Without one, `./.env` is loaded when
/// present; parent directories are not searched. Variables already set in
/// the environment win.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(ConfigError::Env)?;
            Ok(Some(path.to_path_buf()))
        }
        None => load_env_file_if_present(Path::new(DEFAULT_ENV_FILE)),
    }
}

fn load_env_file_if_present(path: &Path) -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::Env(e)),
    }
}

/// Parse the TOML tuning file contents.
pub fn parse_file_config(content: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Load the TOML tuning file from disk.
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_file_config(&content)
}

/// Read a variable from the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Resolve and validate the run configuration.
///
/// `lookup` reads one environment variable; empty values count as unset.
/// Nothing here touches the network.
pub fn resolve_config<L>(lookup: L, sources: &ConfigSources) -> Result<ClientConfig, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    let file = match &sources.file {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };

    let mut transaction = file.transaction;
    sources.overrides.apply(&mut transaction);

    let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let raw = RawClientConfig {
        rpc_url: read(RPC_URL_VAR),
        contract_address: read(CONTRACT_ADDRESS_VAR),
        private_key: read(PRIVATE_KEY_VAR),
        transaction,
    };

    let config = validate_config(&raw).map_err(ConfigError::Validation)?;

    tracing::info!(
        rpc_url = %config.rpc_url,
        contract_address = %config.contract_address,
        rpc_timeout_secs = config.transaction.rpc_timeout_secs,
        confirmation_timeout_secs = config.transaction.confirmation_timeout_secs,
        "Configuration loaded"
    );

    Ok(config)
}
