//! Run configuration
//!
//! Source and destination roots are resolved once at startup - config file
//! first, CLI flags override - and passed into each component from there.
//! No module-scope globals.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::paths;

/// On-disk config file: `~/.config/snapsync/config.toml`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Root containing the dated project folders to back up
    pub source_root: Option<String>,
    /// Root holding the retained snapshots
    pub destination_root: Option<String>,
}

impl ConfigFile {
    /// Load the config file, defaulting to empty if it does not exist
    pub fn load() -> Result<Self> {
        let path = paths::config_file()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config at {}", path.display()))
    }
}

/// Resolved roots for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
}

impl RunConfig {
    /// Build the run configuration from the config file plus CLI overrides
    pub fn resolve(source: Option<&str>, destination: Option<&str>) -> Result<Self> {
        let file = ConfigFile::load()?;

        let source_root = source
            .map(str::to_string)
            .or(file.source_root)
            .context("No source root configured (use --source or set source_root in config.toml)")?;
        let destination_root = destination.map(str::to_string).or(file.destination_root).context(
            "No destination root configured (use --destination or set destination_root in config.toml)",
        )?;

        Ok(Self {
            source_root: paths::expand(&source_root),
            destination_root: paths::expand(&destination_root),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
