//! File read errors for path-based batch analysis.

use std::path::PathBuf;

use super::error_code::{self, GateshiftErrorCode};

/// Errors that can occur while reading a file for analysis.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("File too large: {path} ({size} bytes, max {max})")]
    MaxFileSizeExceeded { path: PathBuf, size: u64, max: u64 },
}

impl GateshiftErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MaxFileSizeExceeded { .. } => error_code::FILE_TOO_LARGE,
            Self::IoError { .. } => error_code::SCAN_ERROR,
        }
    }
}
