//! PatternMatcher tests: structural detection, line numbers, reload behaviour.

use std::io::Write;

use gateshift_analysis::patterns::config::ConfigFormat;
use gateshift_analysis::patterns::{
    EndpointType, Gateway, PatternCategory, PatternConfig, PatternMatcher, PatternRegistry,
};
use gateshift_core::errors::ConfigLoadError;

fn matcher() -> PatternMatcher {
    PatternMatcher::new(PatternRegistry::builtin().expect("builtin patterns compile"))
}

#[test]
fn hosted_payments_url_resolves_to_endpoint_type() {
    let src = "// checkout\nconst base = 'prod';\nconst url = 'https://api.convergepay.com/hosted-payments/transaction_token';\n";
    let m = matcher();

    let endpoints = m.detect_endpoints(src);
    assert_eq!(endpoints.len(), 1, "{endpoints:?}");
    assert_eq!(endpoints[0].line_number, 3);
    assert_eq!(endpoints[0].endpoint_key.as_deref(), Some("hostedPayments"));

    let typed = m.detect_endpoint_types(src);
    assert_eq!(typed.len(), 1);
    assert_eq!(typed[0].0, EndpointType::HostedPayments);
}

#[test]
fn credential_fields_on_distant_lines() {
    let mut lines = vec!["let x = 1;".to_string(); 10_000];
    lines[0] = "ssl_amount = 1".to_string();
    lines[4999] = "ssl_pin = p".to_string();
    lines[9998] = "ssl_card_number = c".to_string();
    let src = lines.join("\n");

    let found: Vec<u32> = matcher()
        .detect_credential_fields(&src)
        .iter()
        .map(|d| d.line_number)
        .collect();
    assert_eq!(found, vec![1, 5000, 9999]);
}

#[test]
fn offsets_point_into_the_original_buffer() {
    let src = "a\n\nform.ssl_amount.value";
    let fields = matcher().detect_credential_fields(src);
    assert_eq!(fields.len(), 1);
    let d = &fields[0];
    assert_eq!(&src[d.byte_range()], "ssl_amount");
    assert_eq!(d.line_number, 3);
}

#[test]
fn every_template_hit_is_reported() {
    let mut config = PatternConfig::builtin();
    config.converge.credential_fields = vec![r"\bssl_amount\b".into(), r"\bssl_[a-z]+\b".into()];
    let m = PatternMatcher::new(PatternRegistry::from_config(config).unwrap());

    let fields = m.detect_credential_fields("ssl_amount");
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].pattern_index, 0);
    assert_eq!(fields[1].pattern_index, 1);
}

#[test]
fn analyze_is_idempotent() {
    let src = "axios.post('https://api.demo.convergepay.com/VirtualMerchantDemo/processxml.do', { ssl_amount: 1 })";
    let m = matcher();
    let first = m.analyze(src);
    assert!(!first.endpoints.is_empty());
    assert!(!first.http_calls.is_empty());
    assert!(!first.api_urls.is_empty());
    assert_eq!(first, m.analyze(src));
}

#[test]
fn empty_and_binary_input() {
    let m = matcher();
    assert!(m.analyze("").is_empty());

    let mut bytes = vec![0xff, 0xfe, 0x00, 0x80];
    bytes.extend_from_slice(b"ssl_amount");
    bytes.extend_from_slice(&[0xc3]);
    let report = m.analyze_bytes(&bytes);
    assert_eq!(report.credential_fields.len(), 1);
    assert_eq!(report.credential_fields[0].byte_offset, 4);
}

#[test]
fn unknown_endpoint_category_is_kept_structurally() {
    let mut config = PatternConfig::builtin();
    config
        .converge
        .endpoints
        .insert("recurring".into(), vec![r"/recurring/add\.do".into()]);
    let m = PatternMatcher::new(PatternRegistry::from_config(config).unwrap());

    let src = "post('/recurring/add.do')";
    let endpoints = m.detect_endpoints(src);
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].endpoint_type(), None);
    assert!(m.detect_endpoint_types(src).is_empty());
}

#[test]
fn target_gateway_matcher() {
    let m = PatternMatcher::for_gateway(PatternRegistry::builtin().unwrap(), Gateway::Elavon);
    let src = r#"fetch("https://uat.api.converge.eu.elavonaws.com/transactions", {})"#;
    assert_eq!(m.detect_endpoints(src).len(), 1);
    assert!(m.detect_credential_fields("ssl_amount").is_empty());
}

#[test]
fn malformed_pattern_file_keeps_previous_config() {
    let registry = PatternRegistry::builtin().unwrap();
    let m = PatternMatcher::new(registry.clone());
    let before = m.analyze("ssl_amount");

    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "converge:\n  credentialFields:\n    - 'ssl_(unclosed'").unwrap();

    let err = registry.load_from_file(file.path()).unwrap_err();
    match err {
        ConfigLoadError::InvalidPattern { gateway, category, index, .. } => {
            assert_eq!(gateway, "converge");
            assert_eq!(category, PatternCategory::CredentialField.config_key());
            assert_eq!(index, 0);
        }
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
    assert_eq!(registry.generation(), 1);
    assert_eq!(m.analyze("ssl_amount"), before);
}

#[test]
fn json_and_yaml_loads_bump_generation() {
    let registry = PatternRegistry::builtin().unwrap();
    let yaml = "converge:\n  credentialFields:\n    - '\\bssl_pin\\b'\n";
    assert_eq!(registry.load_from_str(yaml, ConfigFormat::Yaml).unwrap(), 2);

    let json = r#"{"converge": {"credentialFields": ["\\bssl_amount\\b"]}}"#;
    assert_eq!(registry.load_from_str(json, ConfigFormat::Json).unwrap(), 3);

    let m = PatternMatcher::new(registry);
    assert!(m.detect_credential_fields("ssl_pin").is_empty());
    assert_eq!(m.detect_credential_fields("ssl_amount").len(), 1);
}

#[test]
fn unsupported_extension_is_rejected() {
    let registry = PatternRegistry::builtin().unwrap();
    let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
    let err = registry.load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigLoadError::UnsupportedFormat { .. }));
}
