//! Detection errors.

use super::error_code::{self, GateshiftErrorCode};

/// Errors that can occur while analyzing a single file.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Analysis of {path} panicked: {message}")]
    AnalysisPanic { path: String, message: String },
}

impl GateshiftErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        error_code::DETECTION_ERROR
    }
}
