//! Pattern-table and mapping-dictionary load errors.
//!
//! A load that fails with any of these leaves the previously active
//! configuration in place.

use super::error_code::{self, GateshiftErrorCode};

/// Errors raised while loading a pattern config or mapping dictionary.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Unsupported config format for {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: String },

    #[error("Parse error in {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("Invalid pattern #{index} in {gateway}.{category}: {message}")]
    InvalidPattern {
        gateway: String,
        category: String,
        index: usize,
        pattern: String,
        message: String,
    },

    #[error("Schema violation at {field}: {message}")]
    Schema { field: String, message: String },
}

impl GateshiftErrorCode for ConfigLoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => error_code::INVALID_PATTERN,
            Self::Schema { .. } => error_code::SCHEMA_VIOLATION,
            _ => error_code::CONFIG_LOAD_ERROR,
        }
    }
}
