//! Built-in pattern tables for Converge (source) and Elavon (target).
//! Used whenever no pattern file is configured, and as the fallback
//! generation before the first successful file load.

use indexmap::IndexMap;

use super::config::{GatewayPatterns, PatternConfig};

/// Version label of the built-in table.
pub const BUILTIN_VERSION: &str = "builtin-1";

// ── Converge ──

const CONVERGE_ENDPOINTS: &[(&str, &[&str])] = &[
    (
        "hostedPayments",
        &[
            r"https?://api\.(?:demo\.)?convergepay\.com/hosted-payments(?:/[\w.\-]+)*",
            r"\bPayWithConverge\.open\s*\(",
        ],
    ),
    (
        "checkout",
        &[
            r"\bConvergeEmbeddedPayment\.(?:initMerchant|pay)\b",
            r"\bConvergeLightbox\b",
        ],
    ),
    (
        "processTransaction",
        &[r"https?://api\.(?:demo\.)?convergepay\.com/VirtualMerchant(?:Demo)?/process(?:xml|json)?\.do"],
    ),
    (
        "batchProcessing",
        &[
            r"https?://api\.(?:demo\.)?convergepay\.com/VirtualMerchant(?:Demo)?/(?:batch|settle)\w*\.do",
            r#"["'](?:batchclose|batchimport|settle)["']"#,
        ],
    ),
    (
        "deviceManagement",
        &[
            r"https?://api\.(?:demo\.)?convergepay\.com/(?:VirtualMerchant(?:Demo)?/)?devices?(?:/[\w.\-]+)*",
            r"\bConvergeConnect(?:Device|Terminal)\b",
        ],
    ),
];

const CONVERGE_CREDENTIAL_FIELDS: &[&str] = &[r"\bssl_[a-z0-9_]+\b"];

const CONVERGE_API_URLS: &[&str] = &[
    r#"https?://api\.(?:demo\.)?convergepay\.com[^\s'"<>)`]*"#,
    r#"https?://(?:www\.|demo\.)?myvirtualmerchant\.com[^\s'"<>)`]*"#,
];

const CONVERGE_HTTP_CALLS: &[&str] = &[
    // JavaScript / TypeScript
    r"\b(?:axios|superagent|got)(?:\s*\.\s*(?:post|get|put|request))?\s*\(",
    r"\bfetch\s*\(",
    r"\$\.(?:ajax|post)\s*\(",
    // PHP
    r"\bcurl_setopt\s*\([^)]*CURLOPT_(?:URL|POSTFIELDS)",
    r"\bGuzzleHttp\\Client\b|\$client->(?:post|request)\b",
    // Python
    r"\brequests\.(?:post|get|request)\s*\(",
    r"\burllib\.request\.urlopen\s*\(",
    // Java
    r"\bHttpURLConnection\b",
    r"\bnew\s+HttpPost\s*\(",
    // C#
    r"\.(?:PostAsync|SendAsync|UploadValues)\s*\(",
    // Ruby
    r"\bNet::HTTP(?:\.post_form|\.post|::Post)\b",
];

// ── Elavon ──

const ELAVON_ENDPOINTS: &[(&str, &[&str])] = &[
    (
        "hostedPayments",
        &[r"https?://(?:uat\.)?(?:api|hpp)\.converge\.eu\.elavonaws\.com/payment-sessions\b[\w/\-]*"],
    ),
    (
        "processTransaction",
        &[r"https?://(?:uat\.)?api\.converge\.eu\.elavonaws\.com/transactions\b[\w/\-]*"],
    ),
    (
        "batchProcessing",
        &[r"https?://(?:uat\.)?api\.converge\.eu\.elavonaws\.com/batches\b[\w/\-]*"],
    ),
];

const ELAVON_CREDENTIAL_FIELDS: &[&str] = &[
    r#"["'](?:merchantAlias|secretKey|publicKey|processorAccount|shopperReference)["']"#,
];

const ELAVON_API_URLS: &[&str] = &[r#"https?://(?:uat\.)?(?:api|hpp)\.converge\.eu\.elavonaws\.com[^\s'"<>)`]*"#];

const ELAVON_HTTP_CALLS: &[&str] = &[r#"["']Authorization["']\s*[:,]\s*[^\n]*Basic\b"#];

fn owned(templates: &[&str]) -> Vec<String> {
    templates.iter().map(|t| (*t).to_string()).collect()
}

fn endpoint_table(entries: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(key, templates)| ((*key).to_string(), owned(templates)))
        .collect()
}

impl PatternConfig {
    /// The compiled-in default pattern table.
    pub fn builtin() -> Self {
        Self {
            version: Some(BUILTIN_VERSION.to_string()),
            converge: GatewayPatterns {
                endpoints: endpoint_table(CONVERGE_ENDPOINTS),
                credential_fields: owned(CONVERGE_CREDENTIAL_FIELDS),
                api_urls: owned(CONVERGE_API_URLS),
                http_calls: owned(CONVERGE_HTTP_CALLS),
                case_insensitive: true,
            },
            elavon: GatewayPatterns {
                endpoints: endpoint_table(ELAVON_ENDPOINTS),
                credential_fields: owned(ELAVON_CREDENTIAL_FIELDS),
                api_urls: owned(ELAVON_API_URLS),
                http_calls: owned(ELAVON_HTTP_CALLS),
                case_insensitive: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::types::EndpointType;

    #[test]
    fn builtin_endpoint_keys_resolve() {
        let config = PatternConfig::builtin();
        for key in config.converge.endpoints.keys() {
            assert!(
                EndpointType::from_category_key(key).is_some(),
                "builtin endpoint category {key} has no endpoint type"
            );
        }
    }

    #[test]
    fn builtin_covers_every_category() {
        let config = PatternConfig::builtin();
        assert!(!config.converge.endpoints.is_empty());
        assert!(!config.converge.credential_fields.is_empty());
        assert!(!config.converge.api_urls.is_empty());
        assert!(!config.converge.http_calls.is_empty());
        assert!(config.elavon.template_count() > 0);
    }
}
