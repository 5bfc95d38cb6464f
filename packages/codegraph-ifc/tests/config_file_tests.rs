//! YAML configuration files on disk

mod common;

use codegraph_ifc::config::ConfigError;
use codegraph_ifc::{Criterion, IfcConfig, IfcError, MhpPrecision, Preset, SliceMode};
use common::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_yaml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_overrides_from_file() {
    let file = write_yaml(
        r#"
version: 1
preset: balanced
overrides:
  slicing:
    mode: context_sensitive
    max_context_depth: 3
  mhp:
    default_precision: simple
  parallel:
    enabled: false
  report:
    witness_paths: false
"#,
    );

    let config = IfcConfig::from_yaml(file.path()).unwrap();
    assert_eq!(config.preset, Preset::Balanced);
    assert_eq!(config.slicing.mode, SliceMode::ContextSensitive);
    assert_eq!(config.slicing.max_context_depth, 3);
    assert_eq!(config.mhp.default_precision, MhpPrecision::Simple);
    assert!(!config.parallel.enabled);
    assert_eq!(config.parallel.num_threads, 0);
    assert!(!config.report.witness_paths);
}

#[test]
fn test_saved_config_loads_back() {
    let config = IfcConfig::from_preset(Preset::Thorough)
        .num_threads(4)
        .default_precision(MhpPrecision::Simple);
    let file = write_yaml(&config.to_yaml().unwrap());
    assert_eq!(IfcConfig::from_yaml(file.path()).unwrap(), config);
}

#[test]
fn test_invalid_files_rejected() {
    let out_of_range = write_yaml("version: 1\npreset: fast\noverrides:\n  slicing:\n    max_context_depth: 0\n");
    assert!(matches!(
        IfcConfig::from_yaml(out_of_range.path()),
        Err(ConfigError::Range { .. })
    ));

    let unknown_field = write_yaml("version: 1\npreset: fast\noverrides:\n  slicing:\n    depth: 2\n");
    assert!(matches!(
        IfcConfig::from_yaml(unknown_field.path()),
        Err(ConfigError::Yaml(_))
    ));

    let future = write_yaml("version: 2\npreset: fast\n");
    assert!(matches!(
        IfcConfig::from_yaml(future.path()),
        Err(ConfigError::UnsupportedVersion { found: 2, .. })
    ));

    assert!(matches!(
        IfcConfig::from_yaml("/nonexistent/ifc.yaml"),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_loaded_config_drives_checking() {
    let file = write_yaml("version: 1\npreset: fast\noverrides:\n  mhp:\n    default_precision: none\n");
    let config = IfcConfig::from_yaml(file.path()).unwrap();
    let analysis = interference_analysis(false).with_config(config).unwrap();
    assert!(analysis
        .check_with_default(Criterion::LsodBasic)
        .unwrap()
        .is_empty());
}

#[test]
fn test_invalid_config_rejected_by_analysis() {
    let result = interference_analysis(false)
        .with_config(IfcConfig::default().num_threads(1000));
    assert!(matches!(result, Err(IfcError::Config(ConfigError::Range { .. }))));
}
