//! Analysis configuration
//!
//! Two levels, in the same progressive style as the pipeline config:
//! - Preset: `IfcConfig::from_preset(Preset::Fast)`
//! - YAML: `IfcConfig::from_yaml("ifc.yaml")` with per-section overrides
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_ifc::config::{IfcConfig, Preset};
//!
//! let config = IfcConfig::from_preset(Preset::Thorough)
//!     .slicing(|s| s.max_context_depth(32));
//! config.validate()?;
//! ```

pub mod error;
pub mod ifc_config;
pub mod io;
pub mod preset;

pub use error::{ConfigError, ConfigResult};
pub use ifc_config::{IfcConfig, MhpConfig, ParallelConfig, ReportConfig, SlicingConfig};
pub use io::{ConfigFileV1, ConfigOverrides};
pub use preset::Preset;
