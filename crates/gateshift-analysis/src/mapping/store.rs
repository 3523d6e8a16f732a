//! Hot-reloadable mapping dictionary with field lookup.

use std::cmp::Reverse;
use std::path::Path;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use gateshift_core::errors::ConfigLoadError;
use gateshift_core::types::collections::FxHashMap;

use super::dictionary::{EndpointMapping, MappingDictionary};

/// A resolved field mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResolution {
    /// Key as written in the dictionary.
    pub source_field: String,
    pub target_field: String,
    pub source_endpoint: String,
    pub target_endpoint: String,
    /// True when no endpoint-matching entry knew the field and the
    /// dictionary-order fallback supplied it.
    pub via_fallback: bool,
}

/// One (endpoint, source field) pair that maps to a given target field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseMapping {
    pub source_endpoint: String,
    pub target_endpoint: String,
    pub source_field: String,
}

/// Immutable dictionary version plus its derived indexes.
#[derive(Debug)]
pub struct MappingSnapshot {
    generation: u64,
    dictionary: MappingDictionary,
    /// target field → (entry index, source field) in dictionary order.
    reverse: FxHashMap<String, Vec<(usize, String)>>,
}

impl MappingSnapshot {
    fn build(dictionary: MappingDictionary, generation: u64) -> Self {
        let mut reverse: FxHashMap<String, Vec<(usize, String)>> = FxHashMap::default();
        for (i, entry) in dictionary.mappings.iter().enumerate() {
            for (source, target) in &entry.field_mappings {
                reverse
                    .entry(target.clone())
                    .or_default()
                    .push((i, source.clone()));
            }
        }
        Self {
            generation,
            dictionary,
            reverse,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dictionary(&self) -> &MappingDictionary {
        &self.dictionary
    }

    /// Entries whose source endpoint or category matches any of `probes`,
    /// most specific first.
    ///
    /// An exact endpoint match ranks above a nested one, longer nested
    /// endpoints rank above shorter ones, and category matches come last.
    /// Ties keep dictionary order.
    pub fn entries_for(&self, probes: &[&str]) -> Vec<&EndpointMapping> {
        let mut ranked: Vec<(MatchRank, usize, &EndpointMapping)> = self
            .dictionary
            .mappings
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                probes
                    .iter()
                    .filter_map(|probe| match_rank(entry, probe))
                    .min()
                    .map(|rank| (rank, i, entry))
            })
            .collect();
        ranked.sort_by_key(|(rank, i, _)| (*rank, *i));
        ranked.into_iter().map(|(_, _, entry)| entry).collect()
    }

    /// Resolve `field` for code that talks to any of `probes`.
    ///
    /// Endpoint-matching entries are consulted first, most specific first
    /// (exact key, then normalized key). When none of them knows the field,
    /// the first entry in dictionary order that does is used.
    pub fn resolve(&self, probes: &[&str], field: &str, prefixes: &[String]) -> Option<FieldResolution> {
        self.resolve_near(&[], probes, field, prefixes)
    }

    /// Like [`resolve`](Self::resolve), but entries matching `nearest` are
    /// tried before the wider `probes` set.
    pub fn resolve_near(
        &self,
        nearest: &[&str],
        probes: &[&str],
        field: &str,
        prefixes: &[String],
    ) -> Option<FieldResolution> {
        for group in [nearest, probes] {
            if group.is_empty() {
                continue;
            }
            let matching = self.entries_for(group);
            if let Some(found) = lookup(&matching, field, prefixes) {
                return Some(found.into_resolution(false));
            }
        }
        let all: Vec<&EndpointMapping> = self.dictionary.mappings.iter().collect();
        lookup(&all, field, prefixes).map(|found| found.into_resolution(true))
    }

    /// Every (endpoint, source field) pair mapping to `target_field`.
    pub fn reverse(&self, target_field: &str) -> Vec<ReverseMapping> {
        self.reverse
            .get(target_field)
            .map(|pairs| {
                pairs
                    .iter()
                    .map(|(i, source)| {
                        let entry = &self.dictionary.mappings[*i];
                        ReverseMapping {
                            source_endpoint: entry.source_endpoint.clone(),
                            target_endpoint: entry.target_endpoint.clone(),
                            source_field: source.clone(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

struct Found<'a> {
    entry: &'a EndpointMapping,
    key: &'a str,
    target: &'a str,
}

impl Found<'_> {
    fn into_resolution(self, via_fallback: bool) -> FieldResolution {
        FieldResolution {
            source_field: self.key.to_string(),
            target_field: self.target.to_string(),
            source_endpoint: self.entry.source_endpoint.clone(),
            target_endpoint: self.entry.target_endpoint.clone(),
            via_fallback,
        }
    }
}

fn lookup<'a>(entries: &[&'a EndpointMapping], field: &str, prefixes: &[String]) -> Option<Found<'a>> {
    for &entry in entries {
        if let Some((key, target)) = entry.field_mappings.get_key_value(field) {
            return Some(Found { entry, key, target });
        }
    }
    let probe = normalize_field(field, prefixes);
    for &entry in entries {
        for (key, target) in &entry.field_mappings {
            if normalize_field(key, prefixes) == probe {
                return Some(Found { entry, key, target });
            }
        }
    }
    None
}

/// Case-folded field name with the first matching prefix removed.
pub fn normalize_field(field: &str, prefixes: &[String]) -> String {
    let lower = field.trim().to_ascii_lowercase();
    for prefix in prefixes {
        let prefix = prefix.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix(&prefix) {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    lower
}

fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_ascii_lowercase()
}

/// `inner` occurs in `outer` and ends at a path boundary.
fn contains_at_boundary(outer: &str, inner: &str) -> bool {
    if inner.is_empty() {
        return false;
    }
    outer.match_indices(inner).any(|(i, _)| {
        matches!(
            outer[i + inner.len()..].chars().next(),
            None | Some('/' | '?' | '#' | '.' | '"' | '\'' | '(')
        )
    })
}

/// How specifically a probe matches an entry. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    Exact,
    /// Carries the normalized source endpoint length; longer wins.
    Nested(Reverse<usize>),
    Category,
}

fn match_rank(entry: &EndpointMapping, probe: &str) -> Option<MatchRank> {
    let normalized_probe = normalize_endpoint(probe);
    let source = normalize_endpoint(&entry.source_endpoint);
    if !normalized_probe.is_empty() && !source.is_empty() {
        if normalized_probe == source {
            return Some(MatchRank::Exact);
        }
        if contains_at_boundary(&normalized_probe, &source)
            || contains_at_boundary(&source, &normalized_probe)
        {
            return Some(MatchRank::Nested(Reverse(source.len())));
        }
    }
    (entry.category.as_deref() == Some(probe)).then_some(MatchRank::Category)
}

/// Probe matches when equal to the source endpoint or when either contains
/// the other at a path boundary.
pub fn endpoint_matches(probe: &str, source_endpoint: &str) -> bool {
    let probe = normalize_endpoint(probe);
    let source = normalize_endpoint(source_endpoint);
    if probe.is_empty() || source.is_empty() {
        return false;
    }
    probe == source || contains_at_boundary(&probe, &source) || contains_at_boundary(&source, &probe)
}

struct StoreInner {
    current: ArcSwap<MappingSnapshot>,
    reload_lock: Mutex<()>,
}

/// Shared handle to the active mapping dictionary. Cheap to clone.
#[derive(Clone)]
pub struct MappingStore {
    inner: Arc<StoreInner>,
}

impl MappingStore {
    /// Store seeded with the dictionary shipped in `data/mappings.json`.
    pub fn builtin() -> Result<Self, ConfigLoadError> {
        Self::from_dictionary(MappingDictionary::builtin()?)
    }

    pub fn from_dictionary(dictionary: MappingDictionary) -> Result<Self, ConfigLoadError> {
        dictionary.validate()?;
        Ok(Self {
            inner: Arc::new(StoreInner {
                current: ArcSwap::from_pointee(MappingSnapshot::build(dictionary, 1)),
                reload_lock: Mutex::new(()),
            }),
        })
    }

    pub fn snapshot(&self) -> Arc<MappingSnapshot> {
        self.inner.current.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.inner.current.load().generation()
    }

    /// Swap in a whole new dictionary. Returns the new generation.
    pub fn replace(&self, dictionary: MappingDictionary) -> Result<u64, ConfigLoadError> {
        let _guard = self
            .inner
            .reload_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let previous = self.inner.current.load().generation();
        if let Err(e) = dictionary.validate() {
            tracing::warn!(error = %e, active_generation = previous, "mapping dictionary rejected");
            return Err(e);
        }
        let generation = previous + 1;
        let version = dictionary.version.clone();
        let entries = dictionary.mappings.len();
        self.inner
            .current
            .store(Arc::new(MappingSnapshot::build(dictionary, generation)));
        tracing::info!(generation, version = %version, entries, "mapping dictionary activated");
        Ok(generation)
    }

    pub fn load_from_str(&self, content: &str) -> Result<u64, ConfigLoadError> {
        let dictionary = MappingDictionary::from_json_str(content, "mapping dictionary")
            .inspect_err(|e| tracing::warn!(error = %e, "mapping dictionary could not be parsed"))?;
        self.replace(dictionary)
    }

    pub fn load_from_file(&self, path: &Path) -> Result<u64, ConfigLoadError> {
        let dictionary = MappingDictionary::from_file(path).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "mapping file could not be loaded");
        })?;
        self.replace(dictionary)
    }
}

impl std::fmt::Debug for MappingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingStore")
            .field("generation", &self.generation())
            .finish()
    }
}
