//! GateshiftErrorCode trait for host-facing error codes.

/// Trait for mapping gateshift errors to stable error code strings.
/// Hosts (IDE extensions, CLIs) match on the code rather than the message.
pub trait GateshiftErrorCode {
    /// Returns the error code string (e.g., "CONFIG_LOAD_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted host string: `[ERROR_CODE] message`.
    fn host_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_LOAD_ERROR: &str = "CONFIG_LOAD_ERROR";
pub const INVALID_PATTERN: &str = "INVALID_PATTERN";
pub const SCHEMA_VIOLATION: &str = "SCHEMA_VIOLATION";
pub const DETECTION_ERROR: &str = "DETECTION_ERROR";
pub const MAPPING_ERROR: &str = "MAPPING_ERROR";
pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const FILE_TOO_LARGE: &str = "FILE_TOO_LARGE";
