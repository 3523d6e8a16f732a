//! Declarative pattern tables, user-overridable from JSON or YAML without recompiling.
//!
//! ```yaml
//! converge:
//!   endpoints:
//!     hostedPayments: ['https?://api\.convergepay\.com/hosted-payments[\w/.\-]*']
//!   credentialFields: ['\bssl_[a-z0-9_]+\b']
//!   apiUrls: []
//!   httpCalls: []
//! elavon:
//!   caseInsensitive: false
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use gateshift_core::errors::ConfigLoadError;

use super::types::{Gateway, PatternCategory};

/// Pattern templates for one gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayPatterns {
    /// Named endpoint categories (e.g. `hostedPayments`) → URL templates.
    #[serde(default)]
    pub endpoints: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub credential_fields: Vec<String>,
    #[serde(default)]
    pub api_urls: Vec<String>,
    #[serde(default)]
    pub http_calls: Vec<String>,
    /// Match flag applied to every template of this gateway.
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
}

fn default_case_insensitive() -> bool {
    true
}

impl Default for GatewayPatterns {
    fn default() -> Self {
        Self {
            endpoints: IndexMap::new(),
            credential_fields: Vec::new(),
            api_urls: Vec::new(),
            http_calls: Vec::new(),
            case_insensitive: true,
        }
    }
}

impl GatewayPatterns {
    /// Flat templates for a non-endpoint category.
    pub fn templates(&self, category: PatternCategory) -> &[String] {
        match category {
            PatternCategory::CredentialField => &self.credential_fields,
            PatternCategory::ApiUrl => &self.api_urls,
            PatternCategory::HttpCall => &self.http_calls,
            PatternCategory::EndpointUrl => &[],
        }
    }

    pub fn template_count(&self) -> usize {
        self.endpoints.values().map(Vec::len).sum::<usize>()
            + self.credential_fields.len()
            + self.api_urls.len()
            + self.http_calls.len()
    }
}

/// A full pattern table: one `GatewayPatterns` per gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternConfig {
    /// Free-form version label of the table.
    #[serde(default)]
    pub version: Option<String>,
    pub converge: GatewayPatterns,
    #[serde(default)]
    pub elavon: GatewayPatterns,
}

impl PatternConfig {
    pub fn gateway(&self, gateway: Gateway) -> &GatewayPatterns {
        match gateway {
            Gateway::Converge => &self.converge,
            Gateway::Elavon => &self.elavon,
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigLoadError> {
        serde_json::from_str(content).map_err(|e| ConfigLoadError::Parse {
            source_name: "<json>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigLoadError> {
        serde_yaml::from_str(content).map_err(|e| ConfigLoadError::Parse {
            source_name: "<yaml>".to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a string in the given format.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigLoadError> {
        match format {
            ConfigFormat::Json => Self::from_json_str(content),
            ConfigFormat::Yaml => Self::from_yaml_str(content),
        }
    }

    /// Read and parse a pattern file; the format follows the extension.
    /// Only parsing happens here, regexes are validated at compile time.
    pub fn from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content, format).map_err(|e| match e {
            ConfigLoadError::Parse { message, .. } => ConfigLoadError::Parse {
                source_name: path.display().to_string(),
                message,
            },
            other => other,
        })
    }
}

/// Supported pattern file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigLoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(ConfigFormat::Json),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            _ => Err(ConfigLoadError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}
