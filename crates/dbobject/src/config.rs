// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binding configuration.
//!
//! Supports both programmatic and file-based configuration.
//!
//! ```toml
//! lob_auto_close = true
//! plain_depth_limit = 32
//! max_presize = 4096
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Per-connection settings of the object binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Auto-close flag handed to every LOB wrapper produced while reading.
    #[serde(default = "default_true")]
    pub lob_auto_close: bool,

    /// Maximum nesting depth followed by plain conversion of objects.
    #[serde(default = "default_plain_depth_limit")]
    pub plain_depth_limit: usize,

    /// Upper bound on the capacity reserved up-front when enumerating a
    /// collection from its reported size.
    #[serde(default = "default_max_presize")]
    pub max_presize: usize,
}

fn default_true() -> bool {
    true
}

fn default_plain_depth_limit() -> usize {
    64
}

fn default_max_presize() -> usize {
    65_536
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            lob_auto_close: true,
            plain_depth_limit: default_plain_depth_limit(),
            max_presize: default_max_presize(),
        }
    }
}

impl BindingConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plain_depth_limit == 0 {
            return Err(ConfigError::Invalid(
                "plain_depth_limit must be at least 1".into(),
            ));
        }
        if self.max_presize == 0 {
            return Err(ConfigError::Invalid("max_presize must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BindingConfig::default();
        assert!(config.lob_auto_close);
        assert_eq!(config.plain_depth_limit, 64);
        assert_eq!(config.max_presize, 65_536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = BindingConfig::from_toml_str("lob_auto_close = false").expect("parse");
        assert!(!config.lob_auto_close);
        assert_eq!(config.plain_depth_limit, 64);
    }

    #[test]
    fn test_validation_rejects_zero_limits() {
        assert!(BindingConfig::from_toml_str("plain_depth_limit = 0").is_err());
        assert!(BindingConfig::from_toml_str("max_presize = 0").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "plain_depth_limit = 8\nmax_presize = 16").expect("write");

        let config = BindingConfig::from_file(file.path()).expect("load");
        assert_eq!(config.plain_depth_limit, 8);
        assert_eq!(config.max_presize, 16);
        assert!(config.lob_auto_close);
    }

    #[test]
    fn test_missing_file() {
        let err = BindingConfig::from_file("/nonexistent/dbobject.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
