//! Per-file context extraction and confidence scoring.

pub mod analyzer;
pub mod confidence;
pub mod keywords;
pub mod language;
pub mod profiles;

pub use analyzer::{CodeContext, CodeContextAnalyzer, DetectionScope};
pub use confidence::compute_confidence;
pub use language::Language;
pub use profiles::{LanguageProfile, Scope, ScopeIndex};
