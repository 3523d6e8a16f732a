//! Engine facade: single-file and batch analysis over one pattern snapshot and
//! one mapping snapshot per file, with a fingerprint-keyed result cache.

pub mod cache;
pub mod hasher;
pub mod pipeline;
pub mod types;

pub use cache::{AnalysisCache, CacheKey};
pub use pipeline::MigrationEngine;
pub use types::{AnalysisRequest, AnalysisResponse, BatchResult, FileError};
