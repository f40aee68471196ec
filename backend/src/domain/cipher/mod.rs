//! Field-level authenticated encryption for sensitive record attributes.
//!
//! Every sealed value is laid out as
//! `version (1 byte) || nonce (12 bytes) || ciphertext || tag (16 bytes)`
//! and encrypted with AES-256-GCM under a single process-wide key. The
//! version byte is bound as associated data so it cannot be swapped
//! independently of the ciphertext. Each call draws a fresh random nonce,
//! so sealing the same plaintext twice yields different bytes.
//!
//! Plaintext and ciphertext are distinct types: [`EncryptedField`] does not
//! implement `Display`, so it cannot be fed back into [`FieldCipher::encrypt`].
//! Callers that hold a mix of fresh input and stored ciphertext use
//! [`SensitiveValue`] with [`FieldCipher::seal`], which passes sealed values
//! through untouched.

mod key;

pub use key::{CipherKey, CipherKeyError, KEY_LEN};

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use zeroize::{Zeroize, Zeroizing};

/// Current token layout version.
pub const FORMAT_VERSION: u8 = 0x01;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
const HEADER_LEN: usize = 1 + NONCE_LEN;

/// Ciphertext bytes for a single sensitive field.
///
/// Stored as-is by persistence adapters and only readable through
/// [`FieldCipher::decrypt`].
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedField(Vec<u8>);

impl EncryptedField {
    /// Wrap bytes loaded from storage. Integrity is checked on decrypt.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Raw token bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the field, returning the raw token bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for EncryptedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedField(<{} bytes>)", self.0.len())
    }
}

/// A sensitive attribute that is either fresh plaintext or already sealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensitiveValue {
    /// Caller-supplied plaintext awaiting encryption.
    Plaintext(String),
    /// Ciphertext produced earlier by [`FieldCipher`]; never re-encrypted.
    Sealed(EncryptedField),
}

impl From<String> for SensitiveValue {
    fn from(value: String) -> Self {
        Self::Plaintext(value)
    }
}

impl From<&str> for SensitiveValue {
    fn from(value: &str) -> Self {
        Self::Plaintext(value.to_owned())
    }
}

impl From<EncryptedField> for SensitiveValue {
    fn from(value: EncryptedField) -> Self {
        Self::Sealed(value)
    }
}

/// Encryption failed inside the AEAD primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("field encryption failed")]
pub struct EncryptionError;

/// Decryption was refused. No plaintext is ever returned alongside these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecryptionError {
    /// Fewer bytes than a header plus tag.
    #[error("ciphertext is truncated")]
    Truncated,
    /// Unknown layout version byte.
    #[error("unsupported ciphertext version {0:#04x}")]
    UnsupportedVersion(u8),
    /// Tag verification failed: wrong key or tampered bytes.
    #[error("ciphertext failed authentication")]
    Authentication,
    /// The authenticated plaintext is not UTF-8.
    #[error("decrypted value is not valid UTF-8")]
    InvalidUtf8,
}

/// Authenticated encryption of individual string fields.
///
/// Holds only the expanded key schedule; share it behind an `Arc`.
///
/// # Examples
/// ```
/// use clinic::domain::cipher::{CipherKey, FieldCipher};
///
/// let cipher = FieldCipher::new(&CipherKey::generate());
/// let sealed = cipher.encrypt(Some("555-1234")).unwrap().unwrap();
/// assert_eq!(cipher.decrypt(Some(&sealed)).unwrap().as_deref(), Some("555-1234"));
/// assert_eq!(cipher.encrypt::<str>(None).unwrap(), None);
/// ```
pub struct FieldCipher {
    aead: Aes256Gcm,
    fingerprint: String,
}

impl FieldCipher {
    /// Build a cipher bound to `key`.
    #[must_use]
    pub fn new(key: &CipherKey) -> Self {
        Self {
            aead: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes())),
            fingerprint: key.fingerprint(),
        }
    }

    /// Fingerprint of the key this cipher was built with.
    #[must_use]
    pub fn key_fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Encrypt the string form of `value`; `None` passes through.
    pub fn encrypt<T>(&self, value: Option<&T>) -> Result<Option<EncryptedField>, EncryptionError>
    where
        T: fmt::Display + ?Sized,
    {
        value
            .map(|plain| self.seal_text(&Zeroizing::new(plain.to_string())))
            .transpose()
    }

    /// Encrypt plaintext and pass sealed values through unchanged.
    pub fn seal(
        &self,
        value: Option<SensitiveValue>,
    ) -> Result<Option<EncryptedField>, EncryptionError> {
        match value {
            None => Ok(None),
            Some(SensitiveValue::Sealed(field)) => Ok(Some(field)),
            Some(SensitiveValue::Plaintext(text)) => {
                let text = Zeroizing::new(text);
                self.seal_text(&text).map(Some)
            }
        }
    }

    /// Verify and decrypt `value`; `None` passes through.
    pub fn decrypt(&self, value: Option<&EncryptedField>) -> Result<Option<String>, DecryptionError> {
        value.map(|field| self.open(field.as_bytes())).transpose()
    }

    fn seal_text(&self, plaintext: &str) -> Result<EncryptedField, EncryptionError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let aad = [FORMAT_VERSION];
        let ciphertext = self
            .aead
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: &aad,
                },
            )
            .map_err(|_| EncryptionError)?;

        let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        token.push(FORMAT_VERSION);
        token.extend_from_slice(nonce.as_slice());
        token.extend_from_slice(&ciphertext);
        Ok(EncryptedField(token))
    }

    fn open(&self, token: &[u8]) -> Result<String, DecryptionError> {
        let (version, body) = token.split_first().ok_or(DecryptionError::Truncated)?;
        if *version != FORMAT_VERSION {
            return Err(DecryptionError::UnsupportedVersion(*version));
        }
        if body.len() < NONCE_LEN + TAG_LEN {
            return Err(DecryptionError::Truncated);
        }

        let (nonce, ciphertext) = body.split_at(NONCE_LEN);
        let aad = [FORMAT_VERSION];
        let plaintext = self
            .aead
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: &aad,
                },
            )
            .map_err(|_| DecryptionError::Authentication)?;

        String::from_utf8(plaintext).map_err(|err| {
            err.into_bytes().zeroize();
            DecryptionError::InvalidUtf8
        })
    }
}

impl fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCipher")
            .field("key_fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}
