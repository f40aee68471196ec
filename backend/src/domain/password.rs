//! Argon2 password hashing for staff accounts.

use aes_gcm::aead::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use zeroize::Zeroizing;

use super::validation::{ValidationError, ValidationReason};

/// Hashing failed inside Argon2.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(password_hash::Error);

/// A plaintext password held only long enough to hash or verify it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Reject empty passwords; whitespace is kept verbatim.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::new("password", ValidationReason::Empty));
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Password bytes for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// PHC-formatted Argon2 hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    pub fn generate(password: &Password) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(PasswordHashError)
    }

    /// Wrap a PHC string loaded from storage.
    #[must_use]
    pub fn from_phc(phc: String) -> Self {
        Self(phc)
    }

    /// PHC string for storage.
    #[must_use]
    pub fn as_phc(&self) -> &str {
        &self.0
    }

    /// Check `candidate` against the stored hash. Malformed hashes never match.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        password_hash::PasswordHash::new(&self.0)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(candidate.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn verifies_matching_password_only() {
        let password = Password::new("correct horse").expect("non-empty");
        let hash = PasswordHash::generate(&password).expect("hashing succeeds");
        assert!(hash.as_phc().starts_with("$argon2"));
        assert!(hash.verify("correct horse"));
        assert!(!hash.verify("correct horse "));
        assert!(!hash.verify(""));
    }

    #[rstest]
    fn salts_differ_between_hashes() {
        let password = Password::new("same").expect("non-empty");
        let first = PasswordHash::generate(&password).expect("hash");
        let second = PasswordHash::generate(&password).expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    fn malformed_hash_never_matches() {
        assert!(!PasswordHash::from_phc("not-a-phc".to_owned()).verify("anything"));
    }

    #[rstest]
    fn empty_password_is_rejected() {
        let err = Password::new("").expect_err("empty");
        assert_eq!(err.field(), "password");
    }

    #[rstest]
    fn debug_redacts_secrets() {
        let password = Password::new("hunter2").expect("non-empty");
        assert!(!format!("{password:?}").contains("hunter2"));
        let hash = PasswordHash::generate(&password).expect("hash");
        assert!(!format!("{hash:?}").contains("argon2"));
    }
}
