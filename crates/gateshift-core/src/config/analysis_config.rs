//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Configuration for detection and mapping.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Pattern table override (`.json`, `.yaml` or `.yml`). Built-in table when unset.
    pub pattern_file: Option<String>,
    /// Mapping dictionary override (`.json`). Built-in dictionary when unset.
    pub mapping_file: Option<String>,
    /// Suggestions below this confidence are dropped. Default: 0.0.
    pub min_suggestion_confidence: Option<f64>,
    /// Field-name prefixes stripped before normalized mapping lookup.
    #[serde(default)]
    pub field_prefixes: Vec<String>,
}

impl AnalysisConfig {
    /// Returns the effective minimum suggestion confidence, defaulting to 0.0.
    pub fn effective_min_suggestion_confidence(&self) -> f64 {
        self.min_suggestion_confidence.unwrap_or(0.0)
    }

    /// Returns the effective field prefixes, defaulting to `["ssl_"]`.
    pub fn effective_field_prefixes(&self) -> Vec<String> {
        if self.field_prefixes.is_empty() {
            vec!["ssl_".to_string()]
        } else {
            self.field_prefixes.clone()
        }
    }
}
