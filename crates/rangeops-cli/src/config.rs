//! Resolver configuration for the CLI.
//!
//! Layers, later wins: built-in defaults, the optional `--config` YAML
//! file, then `RANGEOPS_*` environment variables.

use std::path::Path;

use anyhow::{Context, Result};

use rangeops_access::ResolverConfig;

/// Build the effective resolver configuration.
pub fn load_config(path: Option<&Path>) -> Result<ResolverConfig> {
    let base = match path {
        Some(path) => read_config_file(path)?,
        None => ResolverConfig::default(),
    };
    let config = base
        .with_env_overrides()
        .context("invalid RANGEOPS_* environment override")?;
    tracing::debug!(?config, "resolver configuration loaded");
    Ok(config)
}

/// Read a YAML configuration file. Missing keys keep their defaults.
pub fn read_config_file(path: &Path) -> Result<ResolverConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}
