//! gateshift-core: shared foundation for the gateshift migration engine.
//!
//! - Errors: one `thiserror` enum per subsystem, each carrying a stable error code
//! - Config: layered TOML configuration (CLI > env > project file > defaults)
//! - Tracing: `GATESHIFT_LOG`-driven subscriber setup
//! - Types: collection aliases shared across crates

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;
