use blake3::Hasher;

/// Trims and collapses internal whitespace runs to a single space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Computes the 32-byte cache key for a (client, vendor) comparison.
///
/// Both sides are normalized first, so the key is stable across incidental
/// whitespace differences. The separator keeps `("ab", "c")` and `("a", "bc")` apart.
#[inline]
pub fn hash_pair(client_text: &str, vendor_text: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(normalize_text(client_text).as_bytes());
    hasher.update(b"\x1f||\x1f");
    hasher.update(normalize_text(vendor_text).as_bytes());
    *hasher.finalize().as_bytes()
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Used for feature hashing in the stub embedder and for short fingerprints in logs,
/// where a rare collision only blurs a similarity score.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  a   b\n\tc  "), "a b c");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_hash_pair_determinism() {
        let a = hash_pair("The vendor shall encrypt data.", "Data is encrypted.");
        let b = hash_pair("The vendor shall encrypt data.", "Data is encrypted.");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_pair_whitespace_insensitive() {
        let a = hash_pair("  shall   encrypt ", "vendor\ntext");
        let b = hash_pair("shall encrypt", "vendor text");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_pair_order_matters() {
        assert_ne!(hash_pair("a", "b"), hash_pair("b", "a"));
    }

    #[test]
    fn test_hash_pair_boundary() {
        assert_ne!(hash_pair("ab", "c"), hash_pair("a", "bc"));
    }

    #[test]
    fn test_hash_pair_case_sensitive() {
        assert_ne!(hash_pair("GDPR", "x"), hash_pair("gdpr", "x"));
    }

    #[test]
    fn test_hash_to_u64_determinism() {
        assert_eq!(hash_to_u64(b"privacy"), hash_to_u64(b"privacy"));
        assert_ne!(hash_to_u64(b"privacy"), hash_to_u64(b"security"));
    }
}
