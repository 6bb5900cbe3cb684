//! Configuration management for the medledger binaries.

use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default config file looked up by the binaries.
pub const DEFAULT_CONFIG_PATH: &str = "medledger.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            chain_id: default_chain_id(),
        }
    }
}

/// Loads configuration from `path`, falling back to defaults when the file
/// is absent.
pub fn load_config(path: &str) -> Result<LedgerConfig> {
    if !Path::new(path).exists() {
        return Ok(LedgerConfig::default());
    }

    let config_str = fs::read_to_string(path)
        .map_err(|e| LedgerError::Config(format!("Failed to read {}: {}", path, e)))?;
    let config: LedgerConfig = toml::from_str(&config_str)
        .map_err(|e| LedgerError::Config(format!("Failed to parse {}: {}", path, e)))?;

    // Validate critical values
    if config.data_dir.is_empty() {
        return Err(LedgerError::Config(
            "data_dir must be set in the config file".to_string(),
        ));
    }
    if config.chain_id.is_empty() {
        return Err(LedgerError::Config(
            "chain_id must be set in the config file".to_string(),
        ));
    }

    Ok(config)
}

fn default_data_dir() -> String {
    "./ledger-data".to_string()
}

fn default_chain_id() -> String {
    "medledger-main".to_string()
}
