//! View configuration: thresholds and recent-file bookkeeping
//!
//! Loaded from an optional TOML file and overridden by CLI flags.

use crate::error::{Result, TreeError};
use crate::filter::ThresholdFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration of the call-tree view
///
/// # Example
/// ```
/// use arbol::config::ViewConfig;
///
/// let config: ViewConfig = toml::from_str("root_threshold = 100.0").unwrap();
/// assert_eq!(config.root_threshold, 100.0);
/// assert_eq!(config.nested_threshold, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Minimum duration (exclusive) for a top-level call to be displayed
    pub root_threshold: f64,

    /// Minimum duration (exclusive) for any descendant call to be displayed
    pub nested_threshold: f64,

    /// How many recently opened trace files to remember
    #[serde(default = "default_recent_files_limit")]
    pub recent_files_limit: usize,

    /// Where the recent-files list is persisted, if anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_files_path: Option<PathBuf>,
}

fn default_recent_files_limit() -> usize {
    5
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            root_threshold: 0.0,
            nested_threshold: 0.0,
            recent_files_limit: default_recent_files_limit(),
            recent_files_path: None,
        }
    }
}

impl ViewConfig {
    /// Load a configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TreeError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: ViewConfig = toml::from_str(&content)
            .map_err(|e| TreeError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Override thresholds when given
    pub fn with_thresholds(mut self, root: Option<f64>, nested: Option<f64>) -> Self {
        if let Some(root) = root {
            self.root_threshold = root;
        }
        if let Some(nested) = nested {
            self.nested_threshold = nested;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.root_threshold.is_finite() {
            return Err(TreeError::Config(format!(
                "root_threshold must be finite, got {}",
                self.root_threshold
            )));
        }

        if !self.nested_threshold.is_finite() {
            return Err(TreeError::Config(format!(
                "nested_threshold must be finite, got {}",
                self.nested_threshold
            )));
        }

        if self.recent_files_limit == 0 {
            return Err(TreeError::Config(
                "recent_files_limit must be >= 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn filter(&self) -> ThresholdFilter {
        ThresholdFilter::new(self.root_threshold, self.nested_threshold)
    }
}
