//! Confidence scoring for a file's gateway integration.

const CREDENTIAL_WEIGHT: f64 = 0.4;
const MANY_CREDENTIALS_WEIGHT: f64 = 0.2;
const MANY_CREDENTIALS_THRESHOLD: usize = 5;
const BUSINESS_WEIGHT: f64 = 0.2;
const MANY_BUSINESS_WEIGHT: f64 = 0.1;
const MANY_BUSINESS_THRESHOLD: usize = 3;
const LIBRARY_IMPORT_WEIGHT: f64 = 0.2;

/// Additive score over the extracted signals, capped at 1.0.
///
/// The "many" bonuses stack on top of the base weights, so a file with six
/// credential fields earns both 0.4 and 0.2.
pub fn compute_confidence(
    credential_fields: usize,
    business_keywords: usize,
    has_library_import: bool,
) -> f64 {
    let mut score = 0.0;
    if credential_fields > 0 {
        score += CREDENTIAL_WEIGHT;
    }
    if credential_fields > MANY_CREDENTIALS_THRESHOLD {
        score += MANY_CREDENTIALS_WEIGHT;
    }
    if business_keywords > 0 {
        score += BUSINESS_WEIGHT;
    }
    if business_keywords > MANY_BUSINESS_THRESHOLD {
        score += MANY_BUSINESS_WEIGHT;
    }
    if has_library_import {
        score += LIBRARY_IMPORT_WEIGHT;
    }
    f64::min(score, 1.0)
}
