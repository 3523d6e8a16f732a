//! Request/response types for the engine facade.

use serde::{Deserialize, Serialize};

use gateshift_core::errors::{GateshiftErrorCode, PipelineError};

use crate::context::CodeContext;
use crate::mapping::{MigrationPlan, MigrationSuggestion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub file_path: String,
    pub source_text: String,
}

impl AnalysisRequest {
    pub fn new(file_path: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            source_text: source_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub context: CodeContext,
    /// Sorted by confidence, highest first.
    pub suggestions: Vec<MigrationSuggestion>,
    pub plan: MigrationPlan,
    pub pattern_generation: u64,
    pub mapping_generation: u64,
    pub analysis_time_us: u64,
}

/// A file the batch could not analyze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileError {
    pub file_path: String,
    pub code: String,
    pub message: String,
}

impl FileError {
    pub fn from_pipeline(file_path: &str, error: &PipelineError) -> Self {
        Self {
            file_path: file_path.to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Responses in request order, skipped files omitted.
    pub results: Vec<AnalysisResponse>,
    pub processed: usize,
    pub skipped: usize,
    pub errors: Vec<FileError>,
    pub duration_ms: u64,
}

impl BatchResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
