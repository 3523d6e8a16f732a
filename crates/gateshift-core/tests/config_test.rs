//! Tests for the gateshift configuration system.

use std::sync::Mutex;

use gateshift_core::config::gateshift_config::{CliOverrides, GateshiftConfig};
use gateshift_core::errors::ConfigError;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

fn clear_gateshift_env_vars() {
    for key in [
        "GATESHIFT_SCAN_MAX_FILE_SIZE",
        "GATESHIFT_SCAN_THREADS",
        "GATESHIFT_SCAN_CACHE_CAPACITY",
        "GATESHIFT_PATTERN_FILE",
        "GATESHIFT_MAPPING_FILE",
        "GATESHIFT_MIN_SUGGESTION_CONFIDENCE",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gateshift_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("gateshift.toml"),
        r#"
[scan]
max_file_size = 2_000_000

[analysis]
min_suggestion_confidence = 0.3
pattern_file = "project-patterns.yaml"
"#,
    )
    .unwrap();

    std::env::set_var("GATESHIFT_SCAN_MAX_FILE_SIZE", "5000000");

    let cli = CliOverrides {
        min_suggestion_confidence: Some(0.5),
        ..Default::default()
    };

    let config = GateshiftConfig::load(dir.path(), Some(&cli)).unwrap();

    // CLI beats project
    assert_eq!(config.analysis.min_suggestion_confidence, Some(0.5));
    // Env beats project
    assert_eq!(config.scan.max_file_size, Some(5_000_000));
    // Project survives where nothing overrides it
    assert_eq!(
        config.analysis.pattern_file.as_deref(),
        Some("project-patterns.yaml")
    );

    clear_gateshift_env_vars();
}

#[test]
fn test_missing_project_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gateshift_env_vars();

    let dir = tempdir();
    let config = GateshiftConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.scan.effective_max_file_size(), 1_048_576);
    assert_eq!(config.scan.effective_cache_capacity(), 10_000);
    assert_eq!(config.scan.effective_threads(), 0);
    assert_eq!(config.analysis.effective_min_suggestion_confidence(), 0.0);
    assert_eq!(config.analysis.effective_field_prefixes(), vec!["ssl_".to_string()]);
    assert!(config.analysis.pattern_file.is_none());
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gateshift_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("gateshift.toml"), "not = valid = toml [[[").unwrap();

    match GateshiftConfig::load(dir.path(), None) {
        Err(ConfigError::ParseError { .. }) => {}
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_out_of_range_confidence_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gateshift_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("gateshift.toml"),
        "[analysis]\nmin_suggestion_confidence = 1.5\n",
    )
    .unwrap();

    match GateshiftConfig::load(dir.path(), None) {
        Err(ConfigError::ValidationFailed { field, .. }) => {
            assert_eq!(field, "analysis.min_suggestion_confidence");
        }
        other => panic!("Expected ValidationFailed, got: {:?}", other),
    }
}

#[test]
fn test_zero_cache_capacity_accepted() {
    let config = GateshiftConfig::from_toml("[scan]\ncache_capacity = 0\n").unwrap();
    assert!(GateshiftConfig::validate(&config).is_ok());
    assert_eq!(config.scan.effective_cache_capacity(), 0);
}

#[test]
fn test_cli_cache_capacity_beats_env_and_project() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gateshift_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("gateshift.toml"), "[scan]\ncache_capacity = 50\n").unwrap();
    std::env::set_var("GATESHIFT_SCAN_CACHE_CAPACITY", "200");

    let from_env = GateshiftConfig::load(dir.path(), None).unwrap();
    assert_eq!(from_env.scan.cache_capacity, Some(200));

    let cli = CliOverrides {
        scan_cache_capacity: Some(0),
        ..Default::default()
    };
    let from_cli = GateshiftConfig::load(dir.path(), Some(&cli)).unwrap();
    assert_eq!(from_cli.scan.effective_cache_capacity(), 0);

    clear_gateshift_env_vars();
}

#[test]
fn test_unparseable_env_value_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gateshift_env_vars();

    let dir = tempdir();
    std::env::set_var("GATESHIFT_SCAN_THREADS", "many");
    let config = GateshiftConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.scan.threads, None);

    clear_gateshift_env_vars();
}

#[test]
fn test_unknown_keys_accepted() {
    let config = GateshiftConfig::from_toml(
        r#"
[scan]
threads = 4
future_key = "x"

[future_section]
value = 1
"#,
    )
    .unwrap();
    assert_eq!(config.scan.threads, Some(4));
}

#[test]
fn test_round_trip() {
    let config = GateshiftConfig::from_toml(
        r#"
[scan]
max_file_size = 2_000_000
threads = 4

[analysis]
mapping_file = "mappings.json"
field_prefixes = ["ssl_", "txn_"]
"#,
    )
    .unwrap();

    let serialized = config.to_toml().unwrap();
    let reparsed = GateshiftConfig::from_toml(&serialized).unwrap();

    assert_eq!(reparsed.scan.max_file_size, Some(2_000_000));
    assert_eq!(reparsed.scan.threads, Some(4));
    assert_eq!(reparsed.analysis.mapping_file.as_deref(), Some("mappings.json"));
    assert_eq!(reparsed.analysis.field_prefixes, vec!["ssl_", "txn_"]);
}
