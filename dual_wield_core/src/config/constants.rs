//! Dual-wield tuning constants

use super::ConfigError;
use crate::types::StateId;
use serde::{Deserialize, Serialize};

/// Load-time dual-wield settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualWieldConfig {
    /// Status effect that turns dual-wielding off; 0 means none
    #[serde(default)]
    pub disable_state_id: StateId,
    /// Multiplier applied to both hands while dual-wielding
    #[serde(default = "default_dual_wield_modifier")]
    pub dual_wield_modifier: f64,
    /// Additional multiplier for offhand strikes
    #[serde(default = "default_offhand_modifier")]
    pub offhand_modifier: f64,
    /// Multiplier for a two-handed mainhand
    #[serde(default = "default_two_handed_modifier")]
    pub two_handed_modifier: f64,
}

impl Default for DualWieldConfig {
    fn default() -> Self {
        DualWieldConfig {
            disable_state_id: 0,
            dual_wield_modifier: default_dual_wield_modifier(),
            offhand_modifier: default_offhand_modifier(),
            two_handed_modifier: default_two_handed_modifier(),
        }
    }
}

fn default_dual_wield_modifier() -> f64 {
    1.0
}
fn default_offhand_modifier() -> f64 {
    0.75
}
fn default_two_handed_modifier() -> f64 {
    1.5
}

impl DualWieldConfig {
    /// Reject modifiers that cannot produce a meaningful attack value
    pub fn validate(&self) -> Result<(), ConfigError> {
        let modifiers = [
            ("dual_wield_modifier", self.dual_wield_modifier),
            ("offhand_modifier", self.offhand_modifier),
            ("two_handed_modifier", self.two_handed_modifier),
        ];
        for (name, value) in modifiers {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DualWieldConfig = super::parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Settings shipped with the crate
    pub fn shipped() -> Self {
        let toml = include_str!("../../config/dual_wield.toml");
        Self::from_toml(toml).unwrap_or_else(|e| {
            tracing::warn!("shipped dual-wield settings invalid: {e}");
            DualWieldConfig::default()
        })
    }

    /// Whether a disable state is configured at all
    pub fn has_disable_state(&self) -> bool {
        self.disable_state_id != 0
    }
}
