//! Key material for the field cipher.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::domain::material_fingerprint;

/// Length of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Errors raised while decoding encoded key material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CipherKeyError {
    /// The value is not base64 in any accepted alphabet.
    #[error("encryption key is not valid base64")]
    Encoding,
    /// The decoded value has the wrong length.
    #[error("encryption key must decode to {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// A 256-bit symmetric key, wiped from memory on drop.
///
/// Accepts the URL-safe base64 form produced by common key generators
/// (44 characters with padding) as well as the standard alphabet.
///
/// # Examples
/// ```
/// use clinic::domain::cipher::CipherKey;
///
/// let encoded = CipherKey::generate().to_base64();
/// let key = CipherKey::from_base64(&encoded).expect("round-trips");
/// assert_eq!(key.fingerprint().len(), 16);
/// ```
pub struct CipherKey(Zeroizing<[u8; KEY_LEN]>);

impl CipherKey {
    /// Wrap raw key bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Decode base64 key material, tolerating surrounding whitespace.
    pub fn from_base64(encoded: &str) -> Result<Self, CipherKeyError> {
        let trimmed = encoded.trim();
        let decoded = [URL_SAFE, URL_SAFE_NO_PAD, STANDARD, STANDARD_NO_PAD]
            .iter()
            .find_map(|engine| engine.decode(trimmed).ok())
            .map(Zeroizing::new)
            .ok_or(CipherKeyError::Encoding)?;

        if decoded.len() != KEY_LEN {
            return Err(CipherKeyError::Length {
                expected: KEY_LEN,
                actual: decoded.len(),
            });
        }

        let mut key = Zeroizing::new([0_u8; KEY_LEN]);
        key.copy_from_slice(&decoded);
        Ok(Self(key))
    }

    /// Generate a fresh random key from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut key = Zeroizing::new([0_u8; KEY_LEN]);
        OsRng.fill_bytes(key.as_mut_slice());
        Self(key)
    }

    /// URL-safe base64 encoding, suitable for `ENCRYPTION_KEY`.
    #[must_use]
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(URL_SAFE.encode(self.0.as_slice()))
    }

    /// Truncated SHA-256 fingerprint for logs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        material_fingerprint(self.0.as_slice())
    }

    pub(super) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKey")
            .field("fingerprint", &self.fingerprint())
            .finish_non_exhaustive()
    }
}
