//! Preset configurations
//!
//! Presets trade slicing precision for speed.

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Quick triage
    ///
    /// - Slicing: context-insensitive reachability
    /// - MHP default: simple
    /// - No witness paths
    Fast,

    /// Day-to-day checking
    ///
    /// - Slicing: two-phase summary-edge slicing
    /// - MHP default: precise
    #[default]
    Balanced,

    /// Certification runs
    ///
    /// - Slicing: call-string context matching, depth 16
    /// - MHP default: precise
    Thorough,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(Preset::from_str("fast").unwrap(), Preset::Fast);
        assert_eq!(Preset::from_str("FAST").unwrap(), Preset::Fast);
        assert_eq!(Preset::from_str("balanced").unwrap(), Preset::Balanced);
        assert_eq!(Preset::from_str("thorough").unwrap(), Preset::Thorough);
        assert!(matches!(
            Preset::from_str("custom"),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_preset_display() {
        assert_eq!(Preset::Fast.to_string(), "fast");
        assert_eq!(Preset::Thorough.to_string(), "thorough");
        assert_eq!(Preset::default(), Preset::Balanced);
    }
}
