//! gateshift-analysis: detection and mapping engine for Converge → Elavon migrations.
//!
//! Data flows one way:
//! raw text → [`patterns::PatternMatcher`] (structural detections)
//! → [`context::CodeContextAnalyzer`] (confidence-scored context)
//! → [`mapping::MigrationMapper`] (suggestions and substitution plans).
//!
//! [`engine::MigrationEngine`] wires the stages together, adds batching and a result cache.

pub mod context;
pub mod engine;
pub mod mapping;
pub mod patterns;

pub use context::{CodeContext, CodeContextAnalyzer, Language};
pub use engine::{AnalysisRequest, AnalysisResponse, BatchResult, MigrationEngine};
pub use mapping::{MappingStore, MigrationMapper, MigrationPlan, MigrationSuggestion};
pub use patterns::{Detection, PatternConfig, PatternMatcher, PatternRegistry};
