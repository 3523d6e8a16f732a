//! Mapping dictionary: source-field → target-field tables keyed by endpoint.
//!
//! Raw JSON is checked against the dictionary schema before typed
//! deserialization, so a violation reports the exact offending path.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use gateshift_core::errors::ConfigLoadError;

/// One endpoint's field table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointMapping {
    pub source_endpoint: String,
    pub target_endpoint: String,
    #[serde(rename = "method")]
    pub http_method: String,
    /// Endpoint category this entry covers (e.g. `hostedPayments`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Source field → target field, in file order.
    pub field_mappings: IndexMap<String, String>,
}

impl EndpointMapping {
    pub fn new(source_endpoint: &str, target_endpoint: &str, http_method: &str) -> Self {
        Self {
            source_endpoint: source_endpoint.to_string(),
            target_endpoint: target_endpoint.to_string(),
            http_method: http_method.to_string(),
            category: None,
            field_mappings: IndexMap::new(),
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_field(mut self, source: &str, target: &str) -> Self {
        self.field_mappings.insert(source.to_string(), target.to_string());
        self
    }
}

/// Versioned set of endpoint mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDictionary {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub mappings: Vec<EndpointMapping>,
}

const BUILTIN_JSON: &str = include_str!("../../data/mappings.json");

impl MappingDictionary {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            last_updated: None,
            mappings: Vec::new(),
        }
    }

    pub fn with_mapping(mut self, mapping: EndpointMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    /// The dictionary shipped with the crate.
    pub fn builtin() -> Result<Self, ConfigLoadError> {
        Self::from_json_str(BUILTIN_JSON, "builtin mappings.json")
    }

    /// Parse and validate a JSON dictionary. `source_name` labels errors.
    pub fn from_json_str(content: &str, source_name: &str) -> Result<Self, ConfigLoadError> {
        let value: Value = serde_json::from_str(content).map_err(|e| ConfigLoadError::Parse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;
        validate_schema(&value)?;
        serde_json::from_value(value).map_err(|e| ConfigLoadError::Parse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Structural checks for dictionaries built in code.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        for (i, entry) in self.mappings.iter().enumerate() {
            for (name, value) in [
                ("sourceEndpoint", &entry.source_endpoint),
                ("targetEndpoint", &entry.target_endpoint),
                ("method", &entry.http_method),
            ] {
                if value.trim().is_empty() {
                    return Err(schema(
                        format!("mappings[{i}].{name}"),
                        "must be a non-empty string",
                    ));
                }
            }
        }
        Ok(())
    }
}

fn schema(field: String, message: &str) -> ConfigLoadError {
    ConfigLoadError::Schema {
        field,
        message: message.to_string(),
    }
}

fn validate_schema(value: &Value) -> Result<(), ConfigLoadError> {
    let root = value
        .as_object()
        .ok_or_else(|| schema("$".to_string(), "dictionary must be a JSON object"))?;

    match root.get("version") {
        Some(Value::String(_)) => {}
        _ => return Err(schema("version".to_string(), "must be a string")),
    }

    let mappings = match root.get("mappings") {
        Some(Value::Array(items)) => items,
        _ => return Err(schema("mappings".to_string(), "must be an array")),
    };

    for (i, entry) in mappings.iter().enumerate() {
        let entry = entry
            .as_object()
            .ok_or_else(|| schema(format!("mappings[{i}]"), "must be an object"))?;

        for key in ["sourceEndpoint", "targetEndpoint", "method"] {
            match entry.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                _ => {
                    return Err(schema(
                        format!("mappings[{i}].{key}"),
                        "must be a non-empty string",
                    ))
                }
            }
        }

        let fields = match entry.get("fieldMappings") {
            Some(Value::Object(fields)) => fields,
            _ => {
                return Err(schema(
                    format!("mappings[{i}].fieldMappings"),
                    "must be an object",
                ))
            }
        };
        for (source, target) in fields {
            if !target.is_string() {
                return Err(schema(
                    format!("mappings[{i}].fieldMappings.{source}"),
                    "target field must be a string",
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dictionary_is_valid() {
        let dict = MappingDictionary::builtin().unwrap();
        assert!(!dict.mappings.is_empty());
        dict.validate().unwrap();
        // Same source field, different targets per endpoint.
        let targets: Vec<_> = dict
            .mappings
            .iter()
            .filter_map(|m| m.field_mappings.get("ssl_amount"))
            .collect();
        assert!(targets.len() >= 2);
        assert_ne!(targets[0], targets[1]);
    }

    #[test]
    fn field_order_is_preserved() {
        let json = r#"{"version":"1","mappings":[{"sourceEndpoint":"/pay","targetEndpoint":"/t","method":"POST",
            "fieldMappings":{"ssl_z":"z","ssl_a":"a","ssl_m":"m"}}]}"#;
        let dict = MappingDictionary::from_json_str(json, "test").unwrap();
        let keys: Vec<_> = dict.mappings[0].field_mappings.keys().cloned().collect();
        assert_eq!(keys, vec!["ssl_z", "ssl_a", "ssl_m"]);
    }

    #[test]
    fn schema_violations_name_the_path() {
        let cases = [
            (r#"[]"#, "$"),
            (r#"{"version":1,"mappings":[]}"#, "version"),
            (r#"{"version":"1","mappings":{}}"#, "mappings"),
            (
                r#"{"version":"1","mappings":[{"sourceEndpoint":"","targetEndpoint":"/t","method":"POST","fieldMappings":{}}]}"#,
                "mappings[0].sourceEndpoint",
            ),
            (
                r#"{"version":"1","mappings":[{"sourceEndpoint":"/s","targetEndpoint":"/t","fieldMappings":{}}]}"#,
                "mappings[0].method",
            ),
            (
                r#"{"version":"1","mappings":[{"sourceEndpoint":"/s","targetEndpoint":"/t","method":"GET","fieldMappings":[]}]}"#,
                "mappings[0].fieldMappings",
            ),
            (
                r#"{"version":"1","mappings":[{"sourceEndpoint":"/s","targetEndpoint":"/t","method":"GET","fieldMappings":{"ssl_a":3}}]}"#,
                "mappings[0].fieldMappings.ssl_a",
            ),
        ];
        for (json, expected) in cases {
            match MappingDictionary::from_json_str(json, "test") {
                Err(ConfigLoadError::Schema { field, .. }) => assert_eq!(field, expected, "{json}"),
                other => panic!("expected schema error for {json}, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = MappingDictionary::from_json_str("{not json", "broken.json").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }
}
