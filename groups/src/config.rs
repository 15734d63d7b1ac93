//! Group configuration with TOML support.

use crate::distribution::DistributionPolicy;
use crate::GroupError;
use serde::{Deserialize, Serialize};

/// Which distribution policy new groups use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
    FullShare,
    #[default]
    AllClassBonus,
}

/// Settings applied to every group a registry forms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Distribution policy for new groups.
    #[serde(default)]
    pub distribution: DistributionKind,

    /// Bonus (basis points) for a party holding every combat class.
    #[serde(default = "default_all_class_bonus_bps")]
    pub all_class_bonus_bps: u32,

    /// Whether a refused add abandons a group that holds a single member.
    #[serde(default = "default_true")]
    pub disband_on_failed_invite: bool,
}

fn default_all_class_bonus_bps() -> u32 {
    DistributionPolicy::DEFAULT_BONUS_BPS
}

fn default_true() -> bool {
    true
}

impl GroupConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GroupError> {
        toml::from_str(s).map_err(|e| GroupError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, GroupError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GroupError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GroupError> {
        toml::to_string_pretty(self).map_err(|e| GroupError::Config(e.to_string()))
    }

    /// The policy groups formed under this configuration use.
    pub fn policy(&self) -> DistributionPolicy {
        match self.distribution {
            DistributionKind::FullShare => DistributionPolicy::FullShare,
            DistributionKind::AllClassBonus => DistributionPolicy::AllClassBonus {
                bonus_bps: self.all_class_bonus_bps,
            },
        }
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            distribution: DistributionKind::default(),
            all_class_bonus_bps: default_all_class_bonus_bps(),
            disband_on_failed_invite: default_true(),
        }
    }
}
