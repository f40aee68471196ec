//! Password login over the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::access::Identity;
use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::service_support::map_user_repository_error;
use crate::domain::{Error, LoginCredentials};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Verifies submitted passwords against stored argon2 hashes.
#[derive(Clone)]
pub struct PasswordLoginService<U> {
    users: Arc<U>,
}

impl<U> PasswordLoginService<U> {
    /// Create a login service backed by `users`.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> LoginService for PasswordLoginService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_repository_error)?;

        match user {
            Some(user) if user.password_hash.verify(credentials.password()) => {
                Ok(Identity::new(user.id, user.role, user.username))
            }
            _ => {
                debug!(username = credentials.username(), "login rejected");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }
}
