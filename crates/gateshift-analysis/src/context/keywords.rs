//! Fixed keyword tables for dependency hints and payment-domain vocabulary.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use once_cell::sync::Lazy;

/// HTTP client and payment SDK names. Matched as case-insensitive substrings.
pub const HTTP_LIBRARY_KEYWORDS: &[&str] = &[
    "axios",
    "node-fetch",
    "superagent",
    "got",
    "request",
    "jquery",
    "guzzle",
    "curl",
    "requests",
    "urllib",
    "httpx",
    "aiohttp",
    "okhttp",
    "httpclient",
    "resttemplate",
    "webclient",
    "unirest",
    "restsharp",
    "faraday",
    "httparty",
    "net/http",
    "converge",
    "elavon",
];

/// Payment-domain vocabulary.
pub const BUSINESS_KEYWORDS: &[&str] = &[
    "transaction",
    "payment",
    "order",
    "customer",
    "invoice",
    "refund",
    "void",
    "capture",
    "authorize",
    "settle",
];

static LIBRARY_AUTOMATON: Lazy<AhoCorasick> = Lazy::new(|| build(HTTP_LIBRARY_KEYWORDS));
static BUSINESS_AUTOMATON: Lazy<AhoCorasick> = Lazy::new(|| build(BUSINESS_KEYWORDS));

fn build(keywords: &[&str]) -> AhoCorasick {
    AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::Standard)
        .build(keywords)
        .expect("keyword automaton must build")
}

/// Which keywords occur anywhere in `haystack`, reported in table order.
fn hits(automaton: &AhoCorasick, keywords: &[&'static str], haystack: &[u8]) -> Vec<&'static str> {
    let mut seen = vec![false; keywords.len()];
    // Overlapping search so "requests" also reports "request".
    for m in automaton.find_overlapping_iter(haystack) {
        seen[m.pattern().as_usize()] = true;
    }
    keywords
        .iter()
        .zip(seen)
        .filter_map(|(kw, hit)| hit.then_some(*kw))
        .collect()
}

/// Known HTTP/payment library names occurring in `source`.
pub fn dependency_hits(source: &str) -> Vec<&'static str> {
    hits(&LIBRARY_AUTOMATON, HTTP_LIBRARY_KEYWORDS, source.as_bytes())
}

/// Payment-domain keywords occurring in `source`.
pub fn business_keyword_hits(source: &str) -> Vec<&'static str> {
    hits(&BUSINESS_AUTOMATON, BUSINESS_KEYWORDS, source.as_bytes())
}

/// True when the import specifier names a known HTTP/payment library.
pub fn is_library_import(import: &str) -> bool {
    LIBRARY_AUTOMATON.is_match(import)
}
