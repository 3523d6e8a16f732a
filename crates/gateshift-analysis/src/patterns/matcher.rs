//! Structural matcher: applies compiled templates to a text buffer.
//!
//! Matching is purely lexical. Every template is applied with global,
//! non-overlapping semantics; hits from different templates on the same text
//! are all returned. Deduplication belongs to the context analyzer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::compiled::{CompiledPatterns, CompiledTemplate};
use super::registry::PatternRegistry;
use super::types::{EndpointType, Gateway, PatternCategory};

/// A raw structural match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub category: PatternCategory,
    /// Named endpoint category for endpoint detections (e.g. `hostedPayments`).
    pub endpoint_key: Option<String>,
    /// Index of the template that produced this match within its category.
    pub pattern_index: usize,
    /// Matched bytes, lossily decoded.
    pub matched_text: String,
    /// Offset of the match start in the original buffer.
    pub byte_offset: usize,
    /// Length of the match in the original buffer.
    pub byte_len: usize,
    /// 1-based line of the match start.
    pub line_number: u32,
}

impl Detection {
    /// Endpoint type of an endpoint detection; `None` for other categories and
    /// for unrecognized endpoint categories.
    pub fn endpoint_type(&self) -> Option<EndpointType> {
        self.endpoint_key
            .as_deref()
            .and_then(EndpointType::from_category_key)
    }

    /// Byte range of the match in the original buffer.
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.byte_offset..self.byte_offset + self.byte_len
    }
}

/// All four detection lists for one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub endpoints: Vec<Detection>,
    pub credential_fields: Vec<Detection>,
    pub api_urls: Vec<Detection>,
    pub http_calls: Vec<Detection>,
}

impl MatchReport {
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> usize {
        self.endpoints.len() + self.credential_fields.len() + self.api_urls.len() + self.http_calls.len()
    }
}

/// Newline positions of a buffer, for offset → line resolution.
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub fn new(buffer: &[u8]) -> Self {
        let newlines = buffer
            .iter()
            .enumerate()
            .filter_map(|(i, b)| (*b == b'\n').then_some(i))
            .collect();
        Self { newlines }
    }

    /// 1-based line of `offset`: newlines strictly before it, plus one.
    pub fn line_of(&self, offset: usize) -> u32 {
        (self.newlines.partition_point(|&nl| nl < offset) + 1) as u32
    }

    pub fn line_count(&self) -> usize {
        self.newlines.len() + 1
    }
}

impl CompiledPatterns {
    /// Apply every template of one category to `buffer`.
    pub fn scan(
        &self,
        gateway: Gateway,
        category: PatternCategory,
        buffer: &[u8],
        lines: &LineIndex,
    ) -> Vec<Detection> {
        scan_templates(self.gateway(gateway).templates(category), buffer, lines)
    }

    /// Apply all four categories to `buffer`.
    pub fn scan_all(&self, gateway: Gateway, buffer: &[u8]) -> MatchReport {
        if buffer.is_empty() {
            return MatchReport::default();
        }
        let lines = LineIndex::new(buffer);
        MatchReport {
            endpoints: self.scan(gateway, PatternCategory::EndpointUrl, buffer, &lines),
            credential_fields: self.scan(gateway, PatternCategory::CredentialField, buffer, &lines),
            api_urls: self.scan(gateway, PatternCategory::ApiUrl, buffer, &lines),
            http_calls: self.scan(gateway, PatternCategory::HttpCall, buffer, &lines),
        }
    }
}

fn scan_templates(templates: &[CompiledTemplate], buffer: &[u8], lines: &LineIndex) -> Vec<Detection> {
    let mut detections = Vec::new();
    for template in templates {
        for m in template.regex.find_iter(buffer) {
            detections.push(Detection {
                category: template.category,
                endpoint_key: template.endpoint_key.clone(),
                pattern_index: template.index,
                matched_text: String::from_utf8_lossy(m.as_bytes()).into_owned(),
                byte_offset: m.start(),
                byte_len: m.len(),
                line_number: lines.line_of(m.start()),
            });
        }
    }
    detections
}

/// Stateless matcher over the registry's current snapshot.
///
/// Each call loads one snapshot and uses it throughout, so a concurrent reload
/// never produces a mix of two config versions within a single result.
#[derive(Clone)]
pub struct PatternMatcher {
    registry: PatternRegistry,
    gateway: Gateway,
}

impl PatternMatcher {
    /// Matcher for the migration source gateway (Converge).
    pub fn new(registry: PatternRegistry) -> Self {
        Self::for_gateway(registry, Gateway::Converge)
    }

    pub fn for_gateway(registry: PatternRegistry, gateway: Gateway) -> Self {
        Self { registry, gateway }
    }

    pub fn gateway(&self) -> Gateway {
        self.gateway
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    fn snapshot(&self) -> Arc<CompiledPatterns> {
        self.registry.snapshot()
    }

    fn detect(&self, category: PatternCategory, buffer: &[u8]) -> Vec<Detection> {
        if buffer.is_empty() {
            return Vec::new();
        }
        let lines = LineIndex::new(buffer);
        self.snapshot().scan(self.gateway, category, buffer, &lines)
    }

    pub fn detect_endpoints(&self, buffer: &str) -> Vec<Detection> {
        self.detect(PatternCategory::EndpointUrl, buffer.as_bytes())
    }

    pub fn detect_credential_fields(&self, buffer: &str) -> Vec<Detection> {
        self.detect(PatternCategory::CredentialField, buffer.as_bytes())
    }

    pub fn detect_api_urls(&self, buffer: &str) -> Vec<Detection> {
        self.detect(PatternCategory::ApiUrl, buffer.as_bytes())
    }

    pub fn detect_http_calls(&self, buffer: &str) -> Vec<Detection> {
        self.detect(PatternCategory::HttpCall, buffer.as_bytes())
    }

    /// Endpoint detections resolved to their endpoint type; unrecognized
    /// endpoint categories are dropped.
    pub fn detect_endpoint_types(&self, buffer: &str) -> Vec<(EndpointType, Detection)> {
        self.detect_endpoints(buffer)
            .into_iter()
            .filter_map(|d| d.endpoint_type().map(|ty| (ty, d)))
            .collect()
    }

    /// All four categories against `buffer`.
    pub fn analyze(&self, buffer: &str) -> MatchReport {
        self.analyze_bytes(buffer.as_bytes())
    }

    /// All four categories against arbitrary bytes (binary or truncated UTF-8).
    pub fn analyze_bytes(&self, buffer: &[u8]) -> MatchReport {
        self.snapshot().scan_all(self.gateway, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_index_counts_preceding_newlines() {
        let buf = b"a\nbb\n\nccc";
        let idx = LineIndex::new(buf);
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(1), 1); // the newline itself belongs to line 1
        assert_eq!(idx.line_of(2), 2);
        assert_eq!(idx.line_of(5), 3);
        assert_eq!(idx.line_of(6), 4);
        assert_eq!(idx.line_count(), 4);
    }

    #[test]
    fn line_index_empty_buffer() {
        let idx = LineIndex::new(b"");
        assert_eq!(idx.line_of(0), 1);
    }

    #[test]
    fn byte_range_matches_text() {
        let matcher = PatternMatcher::new(PatternRegistry::builtin().unwrap());
        let src = "x = ssl_amount";
        let d = &matcher.detect_credential_fields(src)[0];
        assert_eq!(&src[d.byte_range()], "ssl_amount");
    }
}
