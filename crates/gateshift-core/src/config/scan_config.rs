//! Scan configuration.

use serde::{Deserialize, Serialize};

/// Configuration for reading and batching source files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum file size in bytes. Default: 1MB.
    pub max_file_size: Option<u64>,
    /// Worker threads for batch analysis. Default: rayon's global pool (0).
    pub threads: Option<usize>,
    /// Maximum cached analysis results; `0` disables the cache. Default: 10_000.
    pub cache_capacity: Option<u64>,
}

impl ScanConfig {
    /// Returns the effective max file size, defaulting to 1MB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(1_048_576)
    }

    /// Returns the effective thread count; 0 means "use the global pool".
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    /// Returns the effective cache capacity, defaulting to 10_000 entries.
    pub fn effective_cache_capacity(&self) -> u64 {
        self.cache_capacity.unwrap_or(10_000)
    }
}
