//! Encryption key loading.
//!
//! The key is read once from the environment and handed to
//! [`FieldCipher::new`](crate::domain::cipher::FieldCipher::new). A missing or
//! malformed key is fatal; the server never starts with a generated key.

use std::path::PathBuf;

use mockable::Env;
use zeroize::Zeroizing;

use crate::domain::cipher::{CipherKey, CipherKeyError};

/// Variable holding the base64 encoded key.
pub const ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_KEY";
/// Variable naming a file that holds the base64 encoded key.
pub const ENCRYPTION_KEY_FILE_ENV: &str = "ENCRYPTION_KEY_FILE";

/// Startup failure while resolving the encryption key.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// Neither variable is set to a non-blank value.
    #[error("encryption key missing: set {ENCRYPTION_KEY_ENV} or {ENCRYPTION_KEY_FILE_ENV}")]
    MissingKey,
    /// The key does not decode to exactly 32 bytes.
    #[error("encryption key is invalid: {0}")]
    InvalidKey(#[from] CipherKeyError),
    /// The key file could not be read.
    #[error("failed to read encryption key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Resolve the field encryption key.
///
/// `ENCRYPTION_KEY` wins over `ENCRYPTION_KEY_FILE`. Blank values count as
/// unset.
///
/// # Examples
/// ```
/// use clinic::config::cipher_key_from_env;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "ENCRYPTION_KEY" => Some("AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=".to_owned()),
///     _ => None,
/// });
/// let key = cipher_key_from_env(&env).expect("valid key");
/// assert_eq!(key.fingerprint().len(), 16);
/// ```
pub fn cipher_key_from_env<E: Env>(env: &E) -> Result<CipherKey, ConfigurationError> {
    if let Some(encoded) = non_blank(env.string(ENCRYPTION_KEY_ENV)) {
        let encoded = Zeroizing::new(encoded);
        return Ok(CipherKey::from_base64(&encoded)?);
    }

    let path = non_blank(env.string(ENCRYPTION_KEY_FILE_ENV))
        .map(PathBuf::from)
        .ok_or(ConfigurationError::MissingKey)?;
    let encoded = std::fs::read_to_string(&path)
        .map(Zeroizing::new)
        .map_err(|source| ConfigurationError::KeyRead {
            path: path.clone(),
            source,
        })?;
    Ok(CipherKey::from_base64(&encoded)?)
}
