//! MigrationMapper: field resolution, suggestions and substitution plans.

use gateshift_core::config::AnalysisConfig;

use crate::context::CodeContext;
use crate::patterns::Detection;

use super::plan::{FieldSubstitution, MigrationPlan};
use super::standard_fields::is_standard_field;
use super::store::{FieldResolution, MappingSnapshot, MappingStore, ReverseMapping};
use super::suggestions::{sort_by_confidence, Level, MigrationSuggestion, SuggestionType};

const DIRECT_MAPPING_CONFIDENCE: f64 = 0.9;
const ENDPOINT_CONFIDENCE: f64 = 0.85;
const HARDCODED_CREDENTIAL_CONFIDENCE: f64 = 0.75;
const HTTP_PATTERN_CONFIDENCE: f64 = 0.7;
const CUSTOM_FIELD_CONFIDENCE: f64 = 0.6;
const MANY_FIELDS_CONFIDENCE: f64 = 0.5;
const MANY_FIELDS_THRESHOLD: usize = 5;

/// Resolves detected Converge fragments against the active mapping dictionary.
#[derive(Debug, Clone)]
pub struct MigrationMapper {
    store: MappingStore,
    field_prefixes: Vec<String>,
    min_confidence: f64,
}

impl MigrationMapper {
    pub fn new(store: MappingStore) -> Self {
        Self {
            store,
            field_prefixes: vec!["ssl_".to_string()],
            min_confidence: 0.0,
        }
    }

    pub fn from_config(store: MappingStore, config: &AnalysisConfig) -> Self {
        Self {
            store,
            field_prefixes: config.effective_field_prefixes(),
            min_confidence: config.effective_min_suggestion_confidence(),
        }
    }

    pub fn with_field_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.field_prefixes = prefixes;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Target field for `source_field` when talking to `endpoint`, if any.
    pub fn map_field(&self, endpoint: &str, source_field: &str) -> Option<String> {
        self.resolve_field(endpoint, source_field)
            .map(|r| r.target_field)
    }

    /// Like [`map_field`](Self::map_field) but reports which entry answered.
    pub fn resolve_field(&self, endpoint: &str, source_field: &str) -> Option<FieldResolution> {
        self.store
            .snapshot()
            .resolve(&[endpoint], source_field, &self.field_prefixes)
    }

    /// Every (endpoint, source field) pair that maps to `target_field`.
    pub fn source_fields_for(&self, target_field: &str) -> Vec<ReverseMapping> {
        self.store.snapshot().reverse(target_field)
    }

    /// Suggestions for one analyzed file, highest confidence first.
    pub fn map_suggestions_for_context(&self, context: &CodeContext) -> Vec<MigrationSuggestion> {
        let snapshot = self.store.snapshot();
        self.map_suggestions_with(&snapshot, context)
    }

    /// Suggestions against a specific dictionary snapshot.
    pub fn map_suggestions_with(
        &self,
        snapshot: &MappingSnapshot,
        context: &CodeContext,
    ) -> Vec<MigrationSuggestion> {
        let probes = endpoint_probes(context);

        let mut suggestions = Vec::new();
        suggestions.extend(self.endpoint_suggestions(snapshot, context));
        suggestions.extend(self.field_suggestions(snapshot, context, &probes));
        suggestions.extend(http_call_suggestions(context));
        suggestions.extend(optimization_suggestions(context));

        suggestions.retain(|s| s.confidence >= self.min_confidence);
        sort_by_confidence(&mut suggestions);
        suggestions
    }

    fn endpoint_suggestions(
        &self,
        snapshot: &MappingSnapshot,
        context: &CodeContext,
    ) -> Vec<MigrationSuggestion> {
        let mut seen: Vec<&str> = Vec::new();
        let mut out = Vec::new();
        for detection in sorted(&context.detections.endpoints) {
            if seen.contains(&detection.matched_text.as_str()) {
                continue;
            }
            seen.push(&detection.matched_text);

            let mut probes = vec![detection.matched_text.as_str()];
            probes.extend(detection.endpoint_key.as_deref());
            let Some(entry) = snapshot.entries_for(&probes).into_iter().next() else {
                continue;
            };

            let label = detection.endpoint_key.as_deref().unwrap_or("endpoint");
            out.push(
                MigrationSuggestion::new(
                    SuggestionType::Endpoint,
                    ENDPOINT_CONFIDENCE,
                    Level::High,
                    Level::Medium,
                    detection.matched_text.clone(),
                )
                .with_replacement(format!("{} {}", entry.http_method, entry.target_endpoint))
                .at_line(detection.line_number)
                .because(format!(
                    "Converge {label} call maps to Elavon {} {}",
                    entry.http_method, entry.target_endpoint
                ))
                .because(format!(
                    "{} field mapping(s) known for {}",
                    entry.field_mappings.len(),
                    entry.source_endpoint
                )),
            );
        }
        out
    }

    fn field_suggestions(
        &self,
        snapshot: &MappingSnapshot,
        context: &CodeContext,
        probes: &[&str],
    ) -> Vec<MigrationSuggestion> {
        let detections = sorted(&context.detections.credential_fields);
        context
            .credential_fields
            .iter()
            .map(|field| {
                let first = detections.iter().find(|d| &d.matched_text == field);
                let nearest = first
                    .map(|d| nearest_probes(context, d.byte_offset))
                    .unwrap_or_default();
                let suggestion =
                    match snapshot.resolve_near(&nearest, probes, field, &self.field_prefixes) {
                        Some(resolution) => direct_mapping(field, &resolution),
                        None => custom_field(field),
                    };
                match first {
                    Some(d) => located(suggestion, context, d),
                    None => suggestion,
                }
            })
            .collect()
    }

    /// Concrete renames for every mappable credential-field occurrence.
    pub fn plan(&self, context: &CodeContext, source: &str) -> MigrationPlan {
        let snapshot = self.store.snapshot();
        self.plan_with(&snapshot, context, source)
    }

    pub fn plan_with(&self, snapshot: &MappingSnapshot, context: &CodeContext, source: &str) -> MigrationPlan {
        let probes = endpoint_probes(context);
        let mut plan = MigrationPlan {
            file_path: context.file_path.clone(),
            mapping_generation: snapshot.generation(),
            ..Default::default()
        };

        let mut next_free = 0usize;
        for detection in sorted(&context.detections.credential_fields) {
            if detection.byte_offset < next_free {
                continue;
            }
            let Some(found) = source.get(detection.byte_range()) else {
                continue;
            };
            let nearest = nearest_probes(context, detection.byte_offset);
            match snapshot.resolve_near(&nearest, &probes, found, &self.field_prefixes) {
                Some(resolution) => {
                    let Some((before, after)) =
                        rewrite_line(source, detection.byte_offset, found.len(), &resolution.target_field)
                    else {
                        continue;
                    };
                    plan.substitutions.push(FieldSubstitution {
                        line: detection.line_number,
                        byte_offset: detection.byte_offset,
                        source_field: found.to_string(),
                        target_field: resolution.target_field,
                        before,
                        after,
                    });
                    next_free = detection.byte_offset + found.len();
                }
                None => {
                    if !plan.unmapped_fields.iter().any(|f| f == found) {
                        plan.unmapped_fields.push(found.to_string());
                    }
                }
            }
        }

        tracing::debug!(
            file = %plan.file_path,
            substitutions = plan.substitutions.len(),
            unmapped = plan.unmapped_fields.len(),
            "built migration plan"
        );
        plan
    }
}

/// Endpoint texts, endpoint category keys and API URLs seen in the file.
fn endpoint_probes(context: &CodeContext) -> Vec<&str> {
    let mut probes: Vec<&str> = Vec::new();
    let detections = &context.detections;
    let candidates = detections
        .endpoints
        .iter()
        .flat_map(|d| [Some(d.matched_text.as_str()), d.endpoint_key.as_deref()])
        .chain(detections.api_urls.iter().map(|d| Some(d.matched_text.as_str())))
        .flatten();
    for probe in candidates {
        if !probes.contains(&probe) {
            probes.push(probe);
        }
    }
    probes
}

/// Text and category key of the endpoint or API URL detection closest
/// before `offset`. Endpoint detections win ties at the same offset.
fn nearest_probes(context: &CodeContext, offset: usize) -> Vec<&str> {
    let detections = &context.detections;
    let nearest = detections
        .endpoints
        .iter()
        .chain(&detections.api_urls)
        .filter(|d| d.byte_offset <= offset)
        .max_by_key(|d| (d.byte_offset, d.endpoint_key.is_some()));
    match nearest {
        Some(d) => {
            let mut probes = vec![d.matched_text.as_str()];
            probes.extend(d.endpoint_key.as_deref());
            probes
        }
        None => Vec::new(),
    }
}

/// Attach line and enclosing scope of `detection`.
fn located(suggestion: MigrationSuggestion, context: &CodeContext, detection: &Detection) -> MigrationSuggestion {
    let suggestion = suggestion.at_line(detection.line_number);
    match context.scope_at(detection.category, detection.byte_offset) {
        Some(scope) if !scope.is_empty() => suggestion.in_scope(scope.clone()),
        _ => suggestion,
    }
}

fn sorted(detections: &[Detection]) -> Vec<&Detection> {
    let mut out: Vec<&Detection> = detections.iter().collect();
    out.sort_by_key(|d| d.byte_offset);
    out
}

fn direct_mapping(field: &str, resolution: &FieldResolution) -> MigrationSuggestion {
    let mut suggestion = MigrationSuggestion::new(
        SuggestionType::Field,
        DIRECT_MAPPING_CONFIDENCE,
        Level::Medium,
        Level::Low,
        field,
    )
    .with_replacement(resolution.target_field.clone())
    .because(format!(
        "`{field}` maps directly to `{}` on {}",
        resolution.target_field, resolution.target_endpoint
    ));
    if resolution.via_fallback {
        suggestion = suggestion.because(format!(
            "mapping taken from {} because no detected endpoint lists this field",
            resolution.source_endpoint
        ));
    }
    suggestion
}

fn custom_field(field: &str) -> MigrationSuggestion {
    let suggestion = MigrationSuggestion::new(
        SuggestionType::Field,
        CUSTOM_FIELD_CONFIDENCE,
        Level::Medium,
        Level::High,
        field,
    )
    .because(format!("No Elavon mapping for `{field}`"));
    if is_standard_field(field) {
        suggestion.because("standard Converge field missing from the mapping dictionary")
    } else {
        suggestion.because("custom field; carry it in merchant-defined data or drop it")
    }
}

fn http_call_suggestions(context: &CodeContext) -> Vec<MigrationSuggestion> {
    let mut seen_offsets: Vec<usize> = Vec::new();
    let mut out = Vec::new();
    for detection in sorted(&context.detections.http_calls) {
        if seen_offsets.contains(&detection.byte_offset) {
            continue;
        }
        seen_offsets.push(detection.byte_offset);
        let suggestion = MigrationSuggestion::new(
            SuggestionType::Pattern,
            HTTP_PATTERN_CONFIDENCE,
            Level::Medium,
            Level::Medium,
            detection.matched_text.clone(),
        )
        .because("Converge takes form-encoded or XML posts; Elavon expects JSON over REST")
        .because("send `Content-Type: application/json` with HTTP Basic auth");
        out.push(located(suggestion, context, detection));
    }
    out
}

fn optimization_suggestions(context: &CodeContext) -> Vec<MigrationSuggestion> {
    let mut out = Vec::new();
    if !context.hardcoded_credentials.is_empty() {
        out.push(
            MigrationSuggestion::new(
                SuggestionType::Optimization,
                HARDCODED_CREDENTIAL_CONFIDENCE,
                Level::High,
                Level::Low,
                context.hardcoded_credentials.join(", "),
            )
            .with_replacement("merchantAlias / secretKey read from the environment")
            .because("credentials are hardcoded in source")
            .because("Elavon authenticates with merchant alias and secret key"),
        );
    }
    if context.credential_fields.len() > MANY_FIELDS_THRESHOLD {
        out.push(
            MigrationSuggestion::new(
                SuggestionType::Optimization,
                MANY_FIELDS_CONFIDENCE,
                Level::Low,
                Level::Medium,
                format!("{} ssl_ fields", context.credential_fields.len()),
            )
            .because("request is assembled field by field")
            .because("build one typed payload per Elavon resource instead"),
        );
    }
    out
}

/// The line containing `offset`, before and after renaming `len` bytes.
fn rewrite_line(source: &str, offset: usize, len: usize, target: &str) -> Option<(String, String)> {
    let start = source.get(..offset)?.rfind('\n').map_or(0, |i| i + 1);
    let end = source
        .get(offset..)?
        .find('\n')
        .map_or(source.len(), |i| offset + i);
    let line = source.get(start..end)?.trim_end_matches('\r');
    let rel = offset - start;
    let after = format!("{}{}{}", line.get(..rel)?, target, line.get(rel + len..)?);
    Some((line.to_string(), after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{EndpointMapping, MappingDictionary};

    fn pay_mapper() -> MigrationMapper {
        let dict = MappingDictionary::new("test").with_mapping(
            EndpointMapping::new("/pay", "/transactions", "POST").with_field("ssl_amount", "amount"),
        );
        MigrationMapper::new(MappingStore::from_dictionary(dict).unwrap())
    }

    #[test]
    fn rewrite_line_replaces_only_the_occurrence() {
        let src = "a\nx = ssl_amount + ssl_amount\r\nb";
        let offset = src.find("ssl_amount").unwrap();
        let (before, after) = rewrite_line(src, offset, 10, "amount").unwrap();
        assert_eq!(before, "x = ssl_amount + ssl_amount");
        assert_eq!(after, "x = amount + ssl_amount");
    }

    #[test]
    fn normalized_lookup() {
        let mapper = pay_mapper();
        assert_eq!(mapper.map_field("/pay", "SSL_AMOUNT").as_deref(), Some("amount"));
        assert_eq!(mapper.map_field("/pay", "amount").as_deref(), Some("amount"));
    }

    #[test]
    fn fallback_when_endpoint_does_not_match() {
        let mapper = pay_mapper();
        let r = mapper.resolve_field("/elsewhere", "ssl_amount").unwrap();
        assert!(r.via_fallback);
        assert_eq!(r.target_field, "amount");
    }
}
