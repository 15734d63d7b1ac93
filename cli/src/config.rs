//! CLI configuration with TOML file support.

use party_groups::{GroupConfig, GroupError};
use party_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for the `party` binary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyConfig {
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Settings for every group formed.
    #[serde(default)]
    pub groups: GroupConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PartyConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, GroupError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GroupError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GroupError> {
        toml::from_str(s).map_err(|e| GroupError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GroupError> {
        toml::to_string_pretty(self).map_err(|e| GroupError::Config(e.to_string()))
    }
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            groups: GroupConfig::default(),
        }
    }
}
