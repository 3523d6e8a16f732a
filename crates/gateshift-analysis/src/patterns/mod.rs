//! Gateway pattern tables and the structural matcher.
//!
//! Pattern tables are plain data (`PatternConfig`), compiled once per version
//! into a `CompiledPatterns` snapshot held by the `PatternRegistry`.

pub mod builtin;
pub mod compiled;
pub mod config;
pub mod matcher;
pub mod registry;
pub mod types;

pub use compiled::CompiledPatterns;
pub use config::{GatewayPatterns, PatternConfig};
pub use matcher::{Detection, MatchReport, PatternMatcher};
pub use registry::PatternRegistry;
pub use types::{EndpointType, Gateway, PatternCategory};
