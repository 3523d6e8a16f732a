//! Migration suggestion types.

use serde::{Deserialize, Serialize};

use gateshift_core::types::collections::SmallVec4;

use crate::context::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Endpoint,
    Field,
    Pattern,
    Optimization,
}

/// Impact / effort scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub confidence: f64,
    pub impact: Level,
    pub effort: Level,
    pub code_snippet: String,
    pub suggested_replacement: Option<String>,
    /// 1-based line of the snippet, when it came from a single detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Enclosing function and class of the snippet, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    pub reasoning: SmallVec4<String>,
}

impl MigrationSuggestion {
    pub fn new(kind: SuggestionType, confidence: f64, impact: Level, effort: Level, code_snippet: impl Into<String>) -> Self {
        Self {
            kind,
            confidence,
            impact,
            effort,
            code_snippet: code_snippet.into(),
            suggested_replacement: None,
            line: None,
            scope: None,
            reasoning: SmallVec4::new(),
        }
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.suggested_replacement = Some(replacement.into());
        self
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn in_scope(mut self, scope: Scope) -> Self {
        self.reasoning.push(format!("used in {scope}"));
        self.scope = Some(scope);
        self
    }

    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.reasoning.push(reason.into());
        self
    }
}

/// Descending by confidence; ties keep their generation order.
pub fn sort_by_confidence(suggestions: &mut [MigrationSuggestion]) {
    suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}
