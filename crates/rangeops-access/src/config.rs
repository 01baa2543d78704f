//! Resolver configuration.
//!
//! Defaults match what the mobile client renders. Override via
//! environment variables or explicit construction.

use serde::{Deserialize, Serialize};

/// Default separator for joined breadcrumbs.
pub const DEFAULT_BREADCRUMB_SEPARATOR: &str = " → ";

/// Tunables for one [`AccessResolver`](crate::AccessResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Joins breadcrumb names for sorting and display.
    pub breadcrumb_separator: String,
    /// Delimiters for a membership's precomputed `full_path`, in priority
    /// order. A path is split on the first one it contains.
    pub path_delimiters: Vec<String>,
    /// Report organizations deeper than this. Never enforced.
    pub max_nesting_depth: Option<usize>,
    /// Cap on nodes visited by one descendant traversal.
    /// `None` means the number of nodes in the index.
    pub traversal_ceiling: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            breadcrumb_separator: DEFAULT_BREADCRUMB_SEPARATOR.to_string(),
            path_delimiters: vec!["→".to_string(), "->".to_string(), ".".to_string()],
            max_nesting_depth: None,
            traversal_ceiling: None,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables over the defaults.
    ///
    /// Variables:
    /// - `RANGEOPS_BREADCRUMB_SEPARATOR` (default: `" → "`)
    /// - `RANGEOPS_PATH_DELIMITERS` comma-separated (default: `→,->,.`)
    /// - `RANGEOPS_MAX_NESTING_DEPTH` (default: unset)
    /// - `RANGEOPS_TRAVERSAL_CEILING` (default: unset)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply environment variable overrides on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.overlay(|var| std::env::var(var).ok())
    }

    fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(sep) = lookup("RANGEOPS_BREADCRUMB_SEPARATOR") {
            self.breadcrumb_separator = sep;
        }
        if let Some(raw) = lookup("RANGEOPS_PATH_DELIMITERS") {
            let delimiters: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect();
            if delimiters.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "RANGEOPS_PATH_DELIMITERS".to_string(),
                    raw,
                ));
            }
            self.path_delimiters = delimiters;
        }
        if let Some(raw) = lookup("RANGEOPS_MAX_NESTING_DEPTH") {
            self.max_nesting_depth = Some(parse_count("RANGEOPS_MAX_NESTING_DEPTH", &raw)?);
        }
        if let Some(raw) = lookup("RANGEOPS_TRAVERSAL_CEILING") {
            self.traversal_ceiling = Some(parse_count("RANGEOPS_TRAVERSAL_CEILING", &raw)?);
        }
        Ok(self)
    }
}

fn parse_count(var: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(var.to_string(), raw.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
}
