//! Truncated SHA-256 fingerprints for secret key material.
//!
//! Operators compare fingerprints in logs to confirm which key is active
//! without the key itself ever being printed.

use sha2::{Digest, Sha256};

/// Number of digest bytes kept before hex encoding.
pub const FINGERPRINT_BYTES: usize = 8;

/// Fingerprint `material` as 16 lowercase hex characters.
///
/// # Examples
/// ```
/// use clinic::domain::material_fingerprint;
///
/// let fp = material_fingerprint(&[7u8; 32]);
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn material_fingerprint(material: &[u8]) -> String {
    let digest = Sha256::digest(material);
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn is_deterministic_and_lowercase() {
        let first = material_fingerprint(b"clinic-key");
        assert_eq!(first, material_fingerprint(b"clinic-key"));
        assert_eq!(first, first.to_lowercase());
        assert_eq!(first.len(), FINGERPRINT_BYTES * 2);
    }

    #[rstest]
    fn distinct_material_yields_distinct_fingerprints() {
        assert_ne!(material_fingerprint(&[1; 32]), material_fingerprint(&[2; 32]));
    }
}
