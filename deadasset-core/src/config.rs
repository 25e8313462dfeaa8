//! Configuration loading from deadasset.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Name of the optional configuration file in the project directory.
pub const CONFIG_FILE: &str = "deadasset.toml";

/// Main configuration structure for deadasset.toml.
#[derive(Debug, Deserialize, Default)]
pub struct DeadassetConfig {
    /// Directory names pruned during traversal (added to the defaults).
    pub exclude: Option<Vec<String>>,
    /// Source file extensions to scan (replaces the defaults).
    pub extensions: Option<Vec<String>>,
    /// Asset names or patterns never reported as unused.
    pub ignore: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
    /// Directory (relative) that receives the JSON reports.
    pub dir: Option<String>,
}

/// Loads configuration from deadasset.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<DeadassetConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content).context("Invalid deadasset.toml")?;
    Ok(Some(cfg))
}
