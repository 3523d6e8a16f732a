//! Pipeline error aggregating every subsystem.

use super::error_code::GateshiftErrorCode;
use super::{ConfigError, ConfigLoadError, DetectionError, MappingError, ScanError};

/// Errors that can occur during an analysis run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Config load error: {0}")]
    ConfigLoad(#[from] ConfigLoadError),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),
}

impl GateshiftErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Detection(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::ConfigLoad(e) => e.error_code(),
            Self::Mapping(e) => e.error_code(),
        }
    }
}
