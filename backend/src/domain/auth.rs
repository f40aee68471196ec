//! Login credentials.
//!
//! Handlers validate raw payload strings here before calling the login port.

use zeroize::Zeroizing;

use super::validation::{ValidationError, ValidationReason};

/// Validated username and password pair.
///
/// The username is trimmed; the password keeps caller whitespace so that
/// verification compares exactly what was typed.
///
/// # Examples
/// ```
/// use clinic::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "s3cret").unwrap();
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, ValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::new("username", ValidationReason::Empty));
        }
        if password.is_empty() {
            return Err(ValidationError::new("password", ValidationReason::Empty));
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username for account lookup.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password to verify.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", "username")]
    #[case("   ", "pw", "username")]
    #[case("nurse", "", "password")]
    fn rejects_blank_parts(#[case] username: &str, #[case] password: &str, #[case] field: &str) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("blank input must fail");
        assert_eq!(err.field(), field);
        assert_eq!(err.reason(), ValidationReason::Empty);
    }

    #[rstest]
    fn keeps_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("nurse", " pw ").expect("valid");
        assert_eq!(creds.password(), " pw ");
        assert!(!format!("{creds:?}").contains("pw"));
    }
}
