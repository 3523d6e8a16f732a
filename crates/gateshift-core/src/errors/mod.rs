//! Error handling for gateshift.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod config_load_error;
pub mod detection_error;
pub mod error_code;
pub mod mapping_error;
pub mod pipeline_error;
pub mod scan_error;

pub use config_error::ConfigError;
pub use config_load_error::ConfigLoadError;
pub use detection_error::DetectionError;
pub use error_code::GateshiftErrorCode;
pub use mapping_error::MappingError;
pub use pipeline_error::PipelineError;
pub use scan_error::ScanError;
