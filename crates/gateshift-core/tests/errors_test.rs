//! Tests for the gateshift error handling system.

use std::collections::HashSet;
use std::path::PathBuf;

use gateshift_core::errors::error_code::{self, GateshiftErrorCode};
use gateshift_core::errors::*;

#[test]
fn test_all_errors_have_error_code() {
    let config = ConfigError::FileNotFound {
        path: "gateshift.toml".into(),
    };
    assert_eq!(config.error_code(), error_code::CONFIG_ERROR);

    let load = ConfigLoadError::Parse {
        source_name: "patterns.yaml".into(),
        message: "bad".into(),
    };
    assert_eq!(load.error_code(), error_code::CONFIG_LOAD_ERROR);

    let detection = DetectionError::AnalysisPanic {
        path: "a.js".into(),
        message: "boom".into(),
    };
    assert_eq!(detection.error_code(), error_code::DETECTION_ERROR);

    let scan = ScanError::MaxFileSizeExceeded {
        path: PathBuf::from("big.js"),
        size: 10,
        max: 5,
    };
    assert_eq!(scan.error_code(), error_code::FILE_TOO_LARGE);
}

#[test]
fn test_config_load_error_codes_are_specific() {
    let invalid = ConfigLoadError::InvalidPattern {
        gateway: "converge".into(),
        category: "credentialFields".into(),
        index: 0,
        pattern: "(".into(),
        message: "unclosed group".into(),
    };
    let schema = ConfigLoadError::Schema {
        field: "mappings[0].method".into(),
        message: "must be a non-empty string".into(),
    };
    let unsupported = ConfigLoadError::UnsupportedFormat {
        path: "patterns.ini".into(),
    };

    let codes: HashSet<&str> = [
        invalid.error_code(),
        schema.error_code(),
        unsupported.error_code(),
    ]
    .into_iter()
    .collect();
    assert_eq!(codes.len(), 3);
}

#[test]
fn test_from_conversions() {
    let pipeline: PipelineError = ScanError::IoError {
        path: PathBuf::from("gone.py"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    }
    .into();
    assert!(matches!(pipeline, PipelineError::Scan(_)));
    assert_eq!(pipeline.error_code(), error_code::SCAN_ERROR);

    let pipeline: PipelineError = ConfigLoadError::Schema {
        field: "version".into(),
        message: "missing".into(),
    }
    .into();
    assert!(matches!(pipeline, PipelineError::ConfigLoad(_)));
    assert_eq!(pipeline.error_code(), error_code::SCHEMA_VIOLATION);

    let pipeline: PipelineError = MappingError::SourceMismatch {
        offset: 12,
        expected: "ssl_amount".into(),
        found: "ssl_amoun".into(),
    }
    .into();
    assert!(matches!(pipeline, PipelineError::Mapping(_)));
    assert_eq!(pipeline.error_code(), error_code::MAPPING_ERROR);
}

#[test]
fn test_host_string_format() {
    let err = ConfigError::ValidationFailed {
        field: "scan.max_file_size".into(),
        message: "must be greater than 0".into(),
    };
    let s = err.host_string();
    assert!(s.starts_with("[CONFIG_ERROR] "));
    assert!(s.contains("scan.max_file_size"));
}
