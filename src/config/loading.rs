//! Configuration loading functionality.
//!
//! Resolves the configuration path, reads and parses the TOML file and validates it.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::Config;
use super::validation::validate_config;
use crate::common::constants::*;

/// Load configuration from the default location.
///
/// Returns the default configuration when no file exists there.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        log_debug!(
            "No configuration at {}, using defaults",
            config_path.display()
        );
        return Ok(Config::default());
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            config_path.display()
        )
    })
}

/// Load and validate configuration from an explicit path, which must exist.
pub fn load_from_path(path: &PathBuf) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    validate_config(&config)?;

    Ok(config)
}

/// Default configuration path: `$XDG_CONFIG_HOME/rangepick/rangepick.toml`.
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(APP_NAME).join(CONFIG_FILE_NAME))
}
