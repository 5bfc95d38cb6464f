//! Configuration I/O (YAML schema v1)

use super::error::{ConfigError, ConfigResult};
use super::ifc_config::IfcConfig;
use super::preset::Preset;
use crate::features::concurrency::domain::MhpPrecision;
use crate::features::slicing::domain::SliceMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    pub preset: String,

    /// Fine-grained overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Per-section overrides. Absent fields keep the preset value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slicing: Option<SlicingPatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mhp: Option<MhpPatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<ParallelPatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportPatch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlicingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SliceMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_context_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MhpPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_precision: Option<MhpPrecision>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_paths: Option<bool>,
}

impl ConfigOverrides {
    fn apply(self, mut config: IfcConfig) -> IfcConfig {
        if let Some(p) = self.slicing {
            if let Some(v) = p.mode {
                config.slicing.mode = v;
            }
            if let Some(v) = p.max_context_depth {
                config.slicing.max_context_depth = v;
            }
        }
        if let Some(p) = self.mhp {
            if let Some(v) = p.default_precision {
                config.mhp.default_precision = v;
            }
        }
        if let Some(p) = self.parallel {
            if let Some(v) = p.enabled {
                config.parallel.enabled = v;
            }
            if let Some(v) = p.num_threads {
                config.parallel.num_threads = v;
            }
        }
        if let Some(p) = self.report {
            if let Some(v) = p.witness_paths {
                config.report.witness_paths = v;
            }
        }
        config
    }

    fn full(config: &IfcConfig) -> Self {
        Self {
            slicing: Some(SlicingPatch {
                mode: Some(config.slicing.mode),
                max_context_depth: Some(config.slicing.max_context_depth),
            }),
            mhp: Some(MhpPatch {
                default_precision: Some(config.mhp.default_precision),
            }),
            parallel: Some(ParallelPatch {
                enabled: Some(config.parallel.enabled),
                num_threads: Some(config.parallel.num_threads),
            }),
            report: Some(ReportPatch {
                witness_paths: Some(config.report.witness_paths),
            }),
        }
    }
}

impl IfcConfig {
    /// Load and validate a YAML configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML configuration text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&file.preset)?;
        let config = file
            .overrides
            .unwrap_or_default()
            .apply(IfcConfig::from_preset(preset));
        config.validate()?;
        Ok(config)
    }

    /// Export as YAML v1 (every field written out explicitly)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            preset: self.preset.as_str().to_string(),
            overrides: Some(ConfigOverrides::full(self)),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_roundtrip() {
        let config = IfcConfig::from_preset(Preset::Thorough).slicing(|s| s.max_context_depth(32));
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("preset: thorough"));
        assert!(yaml.contains("max_context_depth: 32"));

        let recovered = IfcConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(recovered, config);
    }

    #[test]
    fn test_partial_override_keeps_preset_values() {
        let yaml = r#"
version: 1
preset: fast
overrides:
  slicing:
    mode: context_sensitive
"#;
        let config = IfcConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.slicing.mode, SliceMode::ContextSensitive);
        assert_eq!(config.slicing.max_context_depth, 4);
        assert_eq!(config.mhp.default_precision, MhpPrecision::Simple);
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = IfcConfig::from_yaml_str("preset: fast\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = IfcConfig::from_yaml_str("version: 2\npreset: fast\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let yaml = r#"
version: 1
preset: balanced
overrides:
  slicing:
    max_depth: 10
"#;
        assert!(matches!(
            IfcConfig::from_yaml_str(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_yaml_override_is_validated() {
        let yaml = r#"
version: 1
preset: balanced
overrides:
  parallel:
    num_threads: 4096
"#;
        assert!(matches!(
            IfcConfig::from_yaml_str(yaml),
            Err(ConfigError::Range { .. })
        ));
    }
}
