//! Configuration system for gateshift.
//! TOML-based, layered resolution: CLI > env > project > defaults.

pub mod analysis_config;
pub mod gateshift_config;
pub mod scan_config;

pub use analysis_config::AnalysisConfig;
pub use gateshift_config::{CliOverrides, GateshiftConfig};
pub use scan_config::ScanConfig;
