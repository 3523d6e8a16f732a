//! Compiled pattern snapshot: every template of a `PatternConfig` compiled once
//! per config generation. Snapshots are immutable and shared via `Arc`.

use regex::bytes::{Regex, RegexBuilder};

use gateshift_core::errors::ConfigLoadError;

use super::config::{GatewayPatterns, PatternConfig};
use super::types::{Gateway, PatternCategory};

/// A single compiled template.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    pub category: PatternCategory,
    /// Named endpoint category for endpoint templates.
    pub endpoint_key: Option<String>,
    /// Position of the template within its category list.
    pub index: usize,
    pub source: String,
    pub regex: Regex,
}

/// All compiled templates for one gateway, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct CompiledGateway {
    pub endpoints: Vec<CompiledTemplate>,
    pub credential_fields: Vec<CompiledTemplate>,
    pub api_urls: Vec<CompiledTemplate>,
    pub http_calls: Vec<CompiledTemplate>,
}

impl CompiledGateway {
    pub fn templates(&self, category: PatternCategory) -> &[CompiledTemplate] {
        match category {
            PatternCategory::EndpointUrl => &self.endpoints,
            PatternCategory::CredentialField => &self.credential_fields,
            PatternCategory::ApiUrl => &self.api_urls,
            PatternCategory::HttpCall => &self.http_calls,
        }
    }
}

/// An immutable, versioned set of compiled templates for both gateways.
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    generation: u64,
    config: PatternConfig,
    converge: CompiledGateway,
    elavon: CompiledGateway,
}

impl CompiledPatterns {
    /// Compile every template in `config`. Any invalid template rejects the
    /// whole config.
    pub fn compile(config: PatternConfig, generation: u64) -> Result<Self, ConfigLoadError> {
        let converge = compile_gateway(Gateway::Converge, &config.converge)?;
        let elavon = compile_gateway(Gateway::Elavon, &config.elavon)?;
        Ok(Self {
            generation,
            config,
            converge,
            elavon,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The source table this snapshot was compiled from.
    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    pub fn gateway(&self, gateway: Gateway) -> &CompiledGateway {
        match gateway {
            Gateway::Converge => &self.converge,
            Gateway::Elavon => &self.elavon,
        }
    }

    pub fn template_count(&self) -> usize {
        self.config.converge.template_count() + self.config.elavon.template_count()
    }
}

fn compile_gateway(
    gateway: Gateway,
    patterns: &GatewayPatterns,
) -> Result<CompiledGateway, ConfigLoadError> {
    let ci = patterns.case_insensitive;
    let mut compiled = CompiledGateway::default();

    let mut index = 0;
    for (key, templates) in &patterns.endpoints {
        if key.trim().is_empty() {
            return Err(ConfigLoadError::InvalidPattern {
                gateway: gateway.to_string(),
                category: PatternCategory::EndpointUrl.config_key().to_string(),
                index,
                pattern: String::new(),
                message: "endpoint category name must be non-empty".to_string(),
            });
        }
        let category_label = format!("{}.{}", PatternCategory::EndpointUrl.config_key(), key);
        for source in templates {
            let regex = compile_template(gateway, &category_label, index, source, ci)?;
            compiled.endpoints.push(CompiledTemplate {
                category: PatternCategory::EndpointUrl,
                endpoint_key: Some(key.clone()),
                index,
                source: source.clone(),
                regex,
            });
            index += 1;
        }
    }

    compiled.credential_fields =
        compile_flat(gateway, PatternCategory::CredentialField, patterns, ci)?;
    compiled.api_urls = compile_flat(gateway, PatternCategory::ApiUrl, patterns, ci)?;
    compiled.http_calls = compile_flat(gateway, PatternCategory::HttpCall, patterns, ci)?;

    Ok(compiled)
}

fn compile_flat(
    gateway: Gateway,
    category: PatternCategory,
    patterns: &GatewayPatterns,
    case_insensitive: bool,
) -> Result<Vec<CompiledTemplate>, ConfigLoadError> {
    patterns
        .templates(category)
        .iter()
        .enumerate()
        .map(|(index, source)| {
            let regex =
                compile_template(gateway, category.config_key(), index, source, case_insensitive)?;
            Ok(CompiledTemplate {
                category,
                endpoint_key: None,
                index,
                source: source.clone(),
                regex,
            })
        })
        .collect()
}

fn compile_template(
    gateway: Gateway,
    category: &str,
    index: usize,
    source: &str,
    case_insensitive: bool,
) -> Result<Regex, ConfigLoadError> {
    let invalid = |message: String| ConfigLoadError::InvalidPattern {
        gateway: gateway.to_string(),
        category: category.to_string(),
        index,
        pattern: source.to_string(),
        message,
    };

    if source.is_empty() {
        return Err(invalid("pattern is empty".to_string()));
    }

    let regex = RegexBuilder::new(source)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| invalid(e.to_string()))?;

    // Zero-width matches would report a hit at every offset.
    if regex.is_match(b"") {
        return Err(invalid("pattern matches the empty string".to_string()));
    }

    Ok(regex)
}
