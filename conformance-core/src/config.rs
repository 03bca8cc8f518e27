//! Validator configuration
//!
//! Loaded from TOML; every field has a default, so an empty file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for [`crate::InterfaceValidator`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Implementation entries starting with this prefix are exempt from the
    /// undeclared-member check. An empty prefix disables the exemption.
    pub private_prefix: String,

    /// Compare declared and implemented parameter counts
    pub check_arity: bool,

    /// Keep private entries in the validated capability
    pub retain_private: bool,

    /// Most outcomes a [`crate::CachedValidator`] keeps; zero disables caching
    pub cache_capacity: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            private_prefix: "_".to_string(),
            check_arity: true,
            retain_private: false,
            cache_capacity: 1024,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse validator config")
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {:?}", path))?;
        Ok(())
    }

    /// Whether an entry name carries the private marker
    pub fn is_private(&self, name: &str) -> bool {
        !self.private_prefix.is_empty() && name.starts_with(&self.private_prefix)
    }
}
