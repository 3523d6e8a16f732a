//! MigrationEngine: owns the registries and runs the analysis pipeline.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use gateshift_core::config::{GateshiftConfig, ScanConfig};
use gateshift_core::errors::{ConfigError, ConfigLoadError, DetectionError, PipelineError, ScanError};

use crate::context::CodeContextAnalyzer;
use crate::mapping::{MappingDictionary, MappingStore, MigrationMapper};
use crate::patterns::{PatternConfig, PatternMatcher, PatternRegistry};

use super::cache::{AnalysisCache, CacheKey};
use super::hasher::fingerprint;
use super::types::{AnalysisRequest, AnalysisResponse, BatchResult, FileError};

/// Facade over matcher, analyzer and mapper.
///
/// Every file is analyzed against exactly one pattern snapshot and one mapping
/// snapshot, loaded when the file starts. Reloads never affect a file in flight.
pub struct MigrationEngine {
    registry: PatternRegistry,
    mappings: MappingStore,
    analyzer: CodeContextAnalyzer,
    mapper: MigrationMapper,
    cache: AnalysisCache,
    max_file_size: u64,
    pool: Option<rayon::ThreadPool>,
    load_errors: Vec<ConfigLoadError>,
}

impl MigrationEngine {
    /// Engine with built-in patterns, built-in mappings and default settings.
    pub fn new() -> Result<Self, ConfigLoadError> {
        let registry = PatternRegistry::builtin()?;
        let mappings = MappingStore::builtin()?;
        let mapper = MigrationMapper::new(mappings.clone());
        Ok(Self::assemble(
            registry,
            mappings,
            mapper,
            &ScanConfig::default(),
            None,
        ))
    }

    /// Engine configured from a resolved `GateshiftConfig`.
    ///
    /// A pattern or mapping file that fails to load is replaced by the
    /// built-in table; the failure is kept in [`load_errors`](Self::load_errors).
    pub fn from_config(config: &GateshiftConfig) -> Result<Self, PipelineError> {
        let mut load_errors = Vec::new();

        let registry = match &config.analysis.pattern_file {
            Some(path) => match PatternConfig::from_file(Path::new(path)).and_then(PatternRegistry::from_config) {
                Ok(registry) => registry,
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "pattern file rejected; using built-in patterns");
                    load_errors.push(e);
                    PatternRegistry::builtin()?
                }
            },
            None => PatternRegistry::builtin()?,
        };
        let mappings = match &config.analysis.mapping_file {
            Some(path) => match MappingDictionary::from_file(Path::new(path)).and_then(MappingStore::from_dictionary) {
                Ok(store) => store,
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "mapping file rejected; using built-in mappings");
                    load_errors.push(e);
                    MappingStore::builtin()?
                }
            },
            None => MappingStore::builtin()?,
        };
        let mapper = MigrationMapper::from_config(mappings.clone(), &config.analysis);

        let threads = config.scan.effective_threads();
        let pool = if threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| ConfigError::ValidationFailed {
                    field: "scan.threads".to_string(),
                    message: e.to_string(),
                })?;
            Some(pool)
        } else {
            None
        };

        tracing::info!(
            pattern_generation = registry.generation(),
            mapping_generation = mappings.generation(),
            threads,
            "migration engine ready"
        );
        let mut engine = Self::assemble(registry, mappings, mapper, &config.scan, pool);
        engine.load_errors = load_errors;
        Ok(engine)
    }

    fn assemble(
        registry: PatternRegistry,
        mappings: MappingStore,
        mapper: MigrationMapper,
        scan: &ScanConfig,
        pool: Option<rayon::ThreadPool>,
    ) -> Self {
        let analyzer = CodeContextAnalyzer::new(PatternMatcher::new(registry.clone()));
        Self {
            registry,
            mappings,
            analyzer,
            mapper,
            cache: AnalysisCache::new(scan.effective_cache_capacity()),
            max_file_size: scan.effective_max_file_size(),
            pool,
            load_errors: Vec::new(),
        }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn mappings(&self) -> &MappingStore {
        &self.mappings
    }

    pub fn analyzer(&self) -> &CodeContextAnalyzer {
        &self.analyzer
    }

    pub fn mapper(&self) -> &MigrationMapper {
        &self.mapper
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Pattern and mapping file failures from construction. The engine runs
    /// on the built-in table for each one listed here.
    pub fn load_errors(&self) -> &[ConfigLoadError] {
        &self.load_errors
    }

    /// Analyze one file: context, sorted suggestions and substitution plan.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResponse {
        let patterns = self.registry.snapshot();
        let mappings = self.mappings.snapshot();
        let key = CacheKey {
            file_path: request.file_path.clone(),
            fingerprint: fingerprint(request.source_text.as_bytes()),
            pattern_generation: patterns.generation(),
            mapping_generation: mappings.generation(),
        };
        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!(file = %request.file_path, "analysis cache hit");
            return (*hit).clone();
        }

        let start = Instant::now();
        let context = self
            .analyzer
            .analyze_with(&patterns, &request.file_path, &request.source_text);
        let suggestions = self.mapper.map_suggestions_with(&mappings, &context);
        let plan = self
            .mapper
            .plan_with(&mappings, &context, &request.source_text);
        let elapsed = start.elapsed();

        let response = AnalysisResponse {
            context,
            suggestions,
            plan,
            pattern_generation: patterns.generation(),
            mapping_generation: mappings.generation(),
            analysis_time_us: elapsed.as_micros() as u64,
        };
        tracing::debug!(
            file = %request.file_path,
            elapsed_us = response.analysis_time_us,
            suggestions = response.suggestions.len(),
            "analyzed file"
        );
        self.cache.insert(key, Arc::new(response.clone()));
        response
    }

    /// Analyze many files in parallel. A file whose analysis panics is
    /// recorded as skipped; the rest of the batch is unaffected.
    pub fn analyze_batch(&self, requests: &[AnalysisRequest]) -> BatchResult {
        let start = Instant::now();
        let outcomes = self.run_parallel(|| {
            requests
                .par_iter()
                .map(|request| (request.file_path.clone(), self.guarded(request)))
                .collect::<Vec<_>>()
        });
        collect_batch(outcomes, start)
    }

    /// Read and analyze files from disk. Unreadable or oversized files are
    /// skipped. Invalid UTF-8 is decoded lossily.
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> BatchResult {
        let start = Instant::now();
        let max = self.max_file_size;
        let outcomes = self.run_parallel(|| {
            paths
                .par_iter()
                .map(|path| {
                    let label = path.to_string_lossy().into_owned();
                    let outcome = read_source(path, max)
                        .map_err(PipelineError::from)
                        .and_then(|text| self.guarded(&AnalysisRequest::new(label.clone(), text)));
                    (label, outcome)
                })
                .collect::<Vec<_>>()
        });
        collect_batch(outcomes, start)
    }

    /// Reload the pattern table from a file. The cache is cleared on success.
    pub fn reload_patterns(&self, path: &Path) -> Result<u64, ConfigLoadError> {
        let generation = self.registry.load_from_file(path)?;
        self.cache.clear();
        Ok(generation)
    }

    pub fn update_patterns(&self, config: PatternConfig) -> Result<u64, ConfigLoadError> {
        let generation = self.registry.update(config)?;
        self.cache.clear();
        Ok(generation)
    }

    /// Reload the mapping dictionary from a file. The cache is cleared on success.
    pub fn reload_mappings(&self, path: &Path) -> Result<u64, ConfigLoadError> {
        let generation = self.mappings.load_from_file(path)?;
        self.cache.clear();
        Ok(generation)
    }

    pub fn replace_mappings(&self, dictionary: MappingDictionary) -> Result<u64, ConfigLoadError> {
        let generation = self.mappings.replace(dictionary)?;
        self.cache.clear();
        Ok(generation)
    }

    fn guarded(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, PipelineError> {
        catch_unwind(AssertUnwindSafe(|| self.analyze(request))).map_err(|payload| {
            DetectionError::AnalysisPanic {
                path: request.file_path.clone(),
                message: panic_message(payload.as_ref()),
            }
            .into()
        })
    }

    fn run_parallel<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl std::fmt::Debug for MigrationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationEngine")
            .field("registry", &self.registry)
            .field("mappings", &self.mappings)
            .field("max_file_size", &self.max_file_size)
            .field("load_errors", &self.load_errors.len())
            .finish()
    }
}

fn read_source(path: &Path, max: u64) -> Result<String, ScanError> {
    let io_err = |source| ScanError::IoError {
        path: path.to_path_buf(),
        source,
    };
    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > max {
        return Err(ScanError::MaxFileSizeExceeded {
            path: path.to_path_buf(),
            size,
            max,
        });
    }
    let bytes = std::fs::read(path).map_err(io_err)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn collect_batch(
    outcomes: Vec<(String, Result<AnalysisResponse, PipelineError>)>,
    start: Instant,
) -> BatchResult {
    let mut batch = BatchResult::default();
    for (file_path, outcome) in outcomes {
        match outcome {
            Ok(response) => {
                batch.processed += 1;
                batch.results.push(response);
            }
            Err(e) => {
                tracing::warn!(file = %file_path, error = %e, "file skipped");
                batch.skipped += 1;
                batch.errors.push(FileError::from_pipeline(&file_path, &e));
            }
        }
    }
    batch.duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        processed = batch.processed,
        skipped = batch.skipped,
        duration_ms = batch.duration_ms,
        "batch complete"
    );
    batch
}
