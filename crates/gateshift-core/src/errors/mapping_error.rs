//! Errors raised while applying a migration plan.

use super::error_code::{self, GateshiftErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Substitution at byte {offset} is out of bounds (source is {len} bytes)")]
    OutOfBounds { offset: usize, len: usize },

    #[error("Source changed at byte {offset}: expected {expected:?}, found {found:?}")]
    SourceMismatch {
        offset: usize,
        expected: String,
        found: String,
    },
}

impl GateshiftErrorCode for MappingError {
    fn error_code(&self) -> &'static str {
        error_code::MAPPING_ERROR
    }
}
