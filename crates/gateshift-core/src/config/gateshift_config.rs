//! Top-level gateshift configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, ScanConfig};
use crate::errors::ConfigError;

/// Project configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "gateshift.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`GATESHIFT_*`)
/// 3. Project config (`gateshift.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GateshiftConfig {
    pub scan: ScanConfig,
    pub analysis: AnalysisConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub scan_max_file_size: Option<u64>,
    pub scan_threads: Option<usize>,
    /// `0` disables the result cache.
    pub scan_cache_capacity: Option<u64>,
    pub pattern_file: Option<String>,
    pub mapping_file: Option<String>,
    pub min_suggestion_confidence: Option<f64>,
}

impl GateshiftConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &GateshiftConfig) -> Result<(), ConfigError> {
        if let Some(threshold) = config.analysis.min_suggestion_confidence {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.min_suggestion_confidence".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        if let Some(max_file_size) = config.scan.max_file_size {
            if max_file_size == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "scan.max_file_size".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if config.analysis.field_prefixes.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::ValidationFailed {
                field: "analysis.field_prefixes".to_string(),
                message: "prefixes must be non-empty".to_string(),
            });
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are ignored (forward-compatible).
    fn merge_toml_file(config: &mut GateshiftConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: GateshiftConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut GateshiftConfig, other: &GateshiftConfig) {
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if other.scan.cache_capacity.is_some() {
            base.scan.cache_capacity = other.scan.cache_capacity;
        }

        if other.analysis.pattern_file.is_some() {
            base.analysis.pattern_file = other.analysis.pattern_file.clone();
        }
        if other.analysis.mapping_file.is_some() {
            base.analysis.mapping_file = other.analysis.mapping_file.clone();
        }
        if other.analysis.min_suggestion_confidence.is_some() {
            base.analysis.min_suggestion_confidence = other.analysis.min_suggestion_confidence;
        }
        if !other.analysis.field_prefixes.is_empty() {
            base.analysis.field_prefixes = other.analysis.field_prefixes.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `GATESHIFT_SCAN_MAX_FILE_SIZE`, `GATESHIFT_PATTERN_FILE`, etc.
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut GateshiftConfig) {
        if let Ok(val) = std::env::var("GATESHIFT_SCAN_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GATESHIFT_SCAN_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GATESHIFT_SCAN_CACHE_CAPACITY") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.cache_capacity = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GATESHIFT_PATTERN_FILE") {
            config.analysis.pattern_file = Some(val);
        }
        if let Ok(val) = std::env::var("GATESHIFT_MAPPING_FILE") {
            config.analysis.mapping_file = Some(val);
        }
        if let Ok(val) = std::env::var("GATESHIFT_MIN_SUGGESTION_CONFIDENCE") {
            if let Ok(v) = val.parse::<f64>() {
                config.analysis.min_suggestion_confidence = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut GateshiftConfig, cli: &CliOverrides) {
        if let Some(v) = cli.scan_max_file_size {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = cli.scan_threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = cli.scan_cache_capacity {
            config.scan.cache_capacity = Some(v);
        }
        if let Some(ref v) = cli.pattern_file {
            config.analysis.pattern_file = Some(v.clone());
        }
        if let Some(ref v) = cli.mapping_file {
            config.analysis.mapping_file = Some(v.clone());
        }
        if let Some(v) = cli.min_suggestion_confidence {
            config.analysis.min_suggestion_confidence = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
