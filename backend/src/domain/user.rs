//! Staff accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::access::Role;
use super::password::{Password, PasswordHash};
use super::validation::{ValidationError, ValidationReason, required_text};
use super::UserId;

const USERNAME_MAX: usize = 50;
const EMAIL_MAX: usize = 100;

/// Unique login name, trimmed and at most 50 characters.
///
/// # Examples
/// ```
/// use clinic::domain::Username;
///
/// let name = Username::new("  reception ").unwrap();
/// assert_eq!(name.as_ref(), "reception");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validate and normalise a login name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        required_text("username", raw.as_ref(), USERNAME_MAX).map(Self)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact address for a staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate that the address has a non-empty local part and domain.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = required_text("email", raw.as_ref(), EMAIL_MAX)?;
        match value.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(value))
            }
            _ => Err(ValidationError::new("email", ValidationReason::Malformed)),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A stored staff account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
}

/// Account data ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
    pub password_hash: PasswordHash,
}

/// Partial account update; `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserChanges {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub role: Option<Role>,
    pub password_hash: Option<PasswordHash>,
}

impl UserChanges {
    /// Apply the supplied fields to `user`.
    pub fn apply_to(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
    pub password: Password,
}

/// Validated account update; the password is hashed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountChanges {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub role: Option<Role>,
    pub password: Option<Password>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.org", true)]
    #[case("  ada@example.org  ", true)]
    #[case("ada", false)]
    #[case("@example.org", false)]
    #[case("ada@", false)]
    #[case("a@b@c", false)]
    fn email_shape(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(EmailAddress::new(raw).is_ok(), valid);
    }

    #[rstest]
    fn username_length_is_bounded() {
        let err = Username::new("x".repeat(51)).expect_err("too long");
        assert_eq!(err.reason(), ValidationReason::TooLong { max: 50 });
        assert!(Username::new("x".repeat(50)).is_ok());
    }
}
