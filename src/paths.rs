//! Path resolution for snapsync
//!
//! `SNAPSYNC_CONFIG_DIR` overrides the config directory; otherwise it
//! resolves to `XDG_CONFIG_HOME/snapsync`, falling back to
//! `~/.config/snapsync`.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "SNAPSYNC_CONFIG_DIR";

/// Get the snapsync config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!("Using config dir from {}: {}", ENV_CONFIG_DIR, path.display());
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("snapsync");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("snapsync"))
}

/// Path of the TOML config file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Expand ~ and environment variables in a path string
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
