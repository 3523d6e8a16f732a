//! Analysis result cache using moka.
//!
//! Keys carry the pattern and mapping generations, so a reload makes every
//! older entry unreachable without an explicit sweep.

use std::sync::Arc;

use moka::sync::Cache;

use super::types::AnalysisResponse;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub file_path: String,
    pub fingerprint: u64,
    pub pattern_generation: u64,
    pub mapping_generation: u64,
}

/// Bounded result cache. A capacity of 0 disables caching.
pub struct AnalysisCache {
    cache: Option<Cache<CacheKey, Arc<AnalysisResponse>>>,
}

impl AnalysisCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = (max_entries > 0).then(|| Cache::builder().max_capacity(max_entries).build());
        Self { cache }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<AnalysisResponse>> {
        self.cache.as_ref()?.get(key)
    }

    pub fn insert(&self, key: CacheKey, response: Arc<AnalysisResponse>) {
        if let Some(cache) = &self.cache {
            cache.insert(key, response);
        }
    }

    /// Approximate entry count; pending maintenance may lag.
    pub fn len(&self) -> u64 {
        match &self.cache {
            Some(cache) => {
                cache.run_pending_tasks();
                cache.entry_count()
            }
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

impl std::fmt::Debug for AnalysisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
