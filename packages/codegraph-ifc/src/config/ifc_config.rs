//! Analysis configuration sections

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use crate::features::concurrency::domain::MhpPrecision;
use crate::features::slicing::domain::SliceMode;
use serde::{Deserialize, Serialize};

/// Slicer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlicingConfig {
    /// Interprocedural precision of every slice in a run
    pub mode: SliceMode,

    /// Longest call string kept in context-sensitive mode (1..=64).
    /// Deeper strings lose their oldest call site.
    pub max_context_depth: usize,
}

impl SlicingConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                mode: SliceMode::ContextInsensitive,
                max_context_depth: 4,
            },
            Preset::Balanced => Self {
                mode: SliceMode::Summary,
                max_context_depth: 8,
            },
            Preset::Thorough => Self {
                mode: SliceMode::ContextSensitive,
                max_context_depth: 16,
            },
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_context_depth == 0 || self.max_context_depth > 64 {
            return Err(ConfigError::range_with_hint(
                "max_context_depth",
                self.max_context_depth,
                1,
                64,
                "Call strings deeper than 64 rarely pay off; use summary mode for deep call chains",
            ));
        }
        Ok(())
    }

    /// Builder: Set mode
    pub fn mode(mut self, v: SliceMode) -> Self {
        self.mode = v;
        self
    }

    /// Builder: Set max_context_depth
    pub fn max_context_depth(mut self, v: usize) -> Self {
        self.max_context_depth = v;
        self
    }
}

/// May-happen-in-parallel settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MhpConfig {
    /// Precision used when a concurrency criterion is checked without an
    /// explicit precision
    pub default_precision: MhpPrecision,
}

impl MhpConfig {
    pub fn from_preset(preset: Preset) -> Self {
        let default_precision = match preset {
            Preset::Fast => MhpPrecision::Simple,
            Preset::Balanced | Preset::Thorough => MhpPrecision::Precise,
        };
        Self { default_precision }
    }
}

/// Parallel execution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelConfig {
    /// Compute per-source and per-sink slices in parallel
    pub enabled: bool,

    /// Worker threads (0 = rayon global pool, otherwise 1..=512)
    pub num_threads: usize,
}

impl ParallelConfig {
    pub fn from_preset(_preset: Preset) -> Self {
        Self {
            enabled: true,
            num_threads: 0,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.num_threads > 512 {
            return Err(ConfigError::range_with_hint(
                "num_threads",
                self.num_threads,
                0,
                512,
                "Use 0 to share the global rayon pool",
            ));
        }
        Ok(())
    }
}

/// Violation report settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Attach a shortest dependence path to every violation
    pub witness_paths: bool,
}

impl ReportConfig {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            witness_paths: !matches!(preset, Preset::Fast),
        }
    }
}

/// Complete analysis configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfcConfig {
    pub preset: Preset,
    pub slicing: SlicingConfig,
    pub mhp: MhpConfig,
    pub parallel: ParallelConfig,
    pub report: ReportConfig,
}

impl IfcConfig {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset,
            slicing: SlicingConfig::from_preset(preset),
            mhp: MhpConfig::from_preset(preset),
            parallel: ParallelConfig::from_preset(preset),
            report: ReportConfig::from_preset(preset),
        }
    }

    /// Override slicing settings
    pub fn slicing(mut self, f: impl FnOnce(SlicingConfig) -> SlicingConfig) -> Self {
        self.slicing = f(self.slicing);
        self
    }

    pub fn default_precision(mut self, precision: MhpPrecision) -> Self {
        self.mhp.default_precision = precision;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel.enabled = enabled;
        self
    }

    pub fn num_threads(mut self, n: usize) -> Self {
        self.parallel.num_threads = n;
        self
    }

    pub fn witness_paths(mut self, enabled: bool) -> Self {
        self.report.witness_paths = enabled;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.slicing.validate()?;
        self.parallel.validate()?;
        Ok(())
    }
}

impl Default for IfcConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}
