//! Content fingerprints via xxh3.

use xxhash_rust::xxh3::xxh3_64;

/// xxh3 64-bit fingerprint of source text.
#[inline]
pub fn fingerprint(content: &[u8]) -> u64 {
    xxh3_64(content)
}
