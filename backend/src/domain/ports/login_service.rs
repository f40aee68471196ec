//! Driving port for login.
//!
//! Inbound adapters call this to turn submitted credentials into an
//! [`Identity`] without touching persistence or password hashing.

use async_trait::async_trait;

use crate::domain::access::Identity;
use crate::domain::{Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the caller's identity.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error>;
}
