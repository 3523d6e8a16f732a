//! CodeContextAnalyzer: per-file contextual signals and confidence.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::patterns::{CompiledPatterns, MatchReport, PatternCategory, PatternMatcher};

use super::confidence::compute_confidence;
use super::keywords::{business_keyword_hits, dependency_hits, is_library_import};
use super::language::Language;
use super::profiles::{profile_for, Scope, ScopeIndex};

/// Login credentials assigned a literal value, in a map literal, a call
/// argument list, or a query string.
static HARDCODED_CREDENTIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(ssl_merchant_id|ssl_user_id|ssl_pin)\b(?:['"]?\s*(?:=>|:|,|=)\s*['"][^'"\s]+['"]|=[A-Za-z0-9]+)"#,
    )
    .expect("hardcoded credential pattern must compile")
});

/// Enclosing scope of one detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionScope {
    pub category: PatternCategory,
    pub byte_offset: usize,
    pub line_number: u32,
    pub scope: Scope,
}

/// Everything the analyzer learned about one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeContext {
    pub file_path: String,
    pub language: Language,
    /// Import specifiers, deduplicated, in order of first appearance.
    pub imports: Vec<String>,
    /// Known HTTP/payment library names mentioned anywhere in the file.
    pub dependencies: Vec<String>,
    pub business_logic_keywords: Vec<String>,
    /// Distinct source-gateway credential field names, in order of first appearance.
    pub credential_fields: Vec<String>,
    /// Login credentials (`ssl_merchant_id`, `ssl_user_id`, `ssl_pin`) given literal values.
    pub hardcoded_credentials: Vec<String>,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    /// Raw source-gateway detections.
    pub detections: MatchReport,
    /// One entry per detection, in offset order. Empty for languages
    /// without an extraction profile.
    pub detection_scopes: Vec<DetectionScope>,
    /// Number of target-gateway detections; non-zero means partially migrated.
    pub target_detections: usize,
    pub confidence: f64,
}

impl CodeContext {
    /// True when the file shows no source-gateway usage at all.
    pub fn is_clean(&self) -> bool {
        self.detections.is_empty()
    }

    /// Scope of the detection of `category` starting at `byte_offset`.
    pub fn scope_at(&self, category: PatternCategory, byte_offset: usize) -> Option<&Scope> {
        self.detection_scopes
            .iter()
            .find(|s| s.category == category && s.byte_offset == byte_offset)
            .map(|s| &s.scope)
    }
}

/// Stateless analyzer. Safe to share across threads.
#[derive(Clone)]
pub struct CodeContextAnalyzer {
    matcher: PatternMatcher,
}

impl CodeContextAnalyzer {
    pub fn new(matcher: PatternMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Analyze `source` against the registry's current snapshot.
    pub fn analyze(&self, file_path: &str, source: &str) -> CodeContext {
        let snapshot = self.matcher.registry().snapshot();
        self.analyze_with(&snapshot, file_path, source)
    }

    /// Analyze `source` against a specific snapshot.
    pub fn analyze_with(
        &self,
        patterns: &CompiledPatterns,
        file_path: &str,
        source: &str,
    ) -> CodeContext {
        let language = Language::from_path(file_path);
        let gateway = self.matcher.gateway();
        let detections = patterns.scan_all(gateway, source.as_bytes());
        let target_detections = patterns
            .scan_all(gateway.counterpart(), source.as_bytes())
            .total();

        let credential_fields = distinct_credential_fields(&detections);
        let hardcoded_credentials = hardcoded_credentials(source);

        let (imports, functions, classes, detection_scopes) = match profile_for(language) {
            Some(profile) => (
                profile.extract_imports(source),
                profile.extract_functions(source),
                profile.extract_classes(source),
                scope_detections(&detections, &profile.scope_index(source)),
            ),
            None => (Vec::new(), Vec::new(), Vec::new(), Vec::new()),
        };

        let dependencies: Vec<String> = dependency_hits(source)
            .into_iter()
            .map(str::to_string)
            .collect();
        let business_logic_keywords: Vec<String> = business_keyword_hits(source)
            .into_iter()
            .map(str::to_string)
            .collect();

        let has_library_import = imports.iter().any(|i| is_library_import(i));
        let confidence = compute_confidence(
            credential_fields.len(),
            business_logic_keywords.len(),
            has_library_import,
        );

        tracing::debug!(
            file = file_path,
            language = %language,
            credential_fields = credential_fields.len(),
            confidence,
            "analyzed file context"
        );

        CodeContext {
            file_path: file_path.to_string(),
            language,
            imports,
            dependencies,
            business_logic_keywords,
            credential_fields,
            hardcoded_credentials,
            functions,
            classes,
            detections,
            detection_scopes,
            target_detections,
            confidence,
        }
    }

    /// Nearest function and class declared before `offset` in `source`.
    pub fn enclosing_scope(&self, file_path: &str, source: &str, offset: usize) -> Scope {
        profile_for(Language::from_path(file_path))
            .map(|p| p.enclosing_scope(source, offset))
            .unwrap_or_default()
    }
}

fn scope_detections(report: &MatchReport, index: &ScopeIndex) -> Vec<DetectionScope> {
    let mut scopes: Vec<DetectionScope> = report
        .endpoints
        .iter()
        .chain(&report.credential_fields)
        .chain(&report.api_urls)
        .chain(&report.http_calls)
        .map(|d| DetectionScope {
            category: d.category,
            byte_offset: d.byte_offset,
            line_number: d.line_number,
            scope: index.scope_at(d.byte_offset),
        })
        .collect();
    scopes.sort_by_key(|s| s.byte_offset);
    scopes
}

fn hardcoded_credentials(source: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for caps in HARDCODED_CREDENTIAL.captures_iter(source) {
        if let Some(m) = caps.get(1) {
            let name = m.as_str().to_ascii_lowercase();
            if !fields.contains(&name) {
                fields.push(name);
            }
        }
    }
    fields
}

fn distinct_credential_fields(report: &MatchReport) -> Vec<String> {
    let mut hits: Vec<_> = report.credential_fields.iter().collect();
    hits.sort_by_key(|d| d.byte_offset);
    let mut fields: Vec<String> = Vec::new();
    for d in hits {
        if !fields.contains(&d.matched_text) {
            fields.push(d.matched_text.clone());
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternRegistry;

    fn analyzer() -> CodeContextAnalyzer {
        let registry = PatternRegistry::builtin().unwrap();
        CodeContextAnalyzer::new(PatternMatcher::new(registry))
    }

    #[test]
    fn credential_fields_are_distinct_in_source_order() {
        let ctx = analyzer().analyze("a.js", "ssl_pin; ssl_amount; ssl_pin;");
        assert_eq!(ctx.credential_fields, vec!["ssl_pin", "ssl_amount"]);
    }

    #[test]
    fn literal_credentials_are_flagged() {
        let src = "$params = ['ssl_merchant_id' => '009999', 'ssl_pin' => $pin];\n\
                   $url = \"...?ssl_user_id=webpage&ssl_amount=1\";";
        let ctx = analyzer().analyze("pay.php", src);
        assert_eq!(ctx.hardcoded_credentials, vec!["ssl_merchant_id", "ssl_user_id"]);
    }

    #[test]
    fn unknown_language_still_gets_keywords() {
        let ctx = analyzer().analyze("notes.txt", "refund the order");
        assert_eq!(ctx.language, Language::Unknown);
        assert!(ctx.imports.is_empty());
        assert_eq!(ctx.business_logic_keywords, vec!["order", "refund"]);
    }

    #[test]
    fn every_detection_gets_a_scope() {
        let src = "class Pay {\n  charge() {\n    post(url, { ssl_amount: 1 });\n  }\n}\n";
        let ctx = analyzer().analyze("pay.js", src);
        let offset = src.find("ssl_amount").unwrap();
        let scope = ctx.scope_at(PatternCategory::CredentialField, offset).unwrap();
        assert_eq!(scope.function.as_deref(), Some("charge"));
        assert_eq!(scope.class.as_deref(), Some("Pay"));
        assert_eq!(ctx.detection_scopes.len(), ctx.detections.total());
    }

    #[test]
    fn empty_source() {
        let ctx = analyzer().analyze("empty.py", "");
        assert!(ctx.is_clean());
        assert_eq!(ctx.confidence, 0.0);
    }
}
