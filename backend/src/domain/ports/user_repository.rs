//! Driven port for staff account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewUser, User, UserChanges, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Backing store could not be reached.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername { username: String } => "username already exists: {username}",
    }
}

/// Persistence for staff accounts. Usernames are unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account and assign its id.
    async fn insert(
        &self,
        user: NewUser,
        created_at: DateTime<Utc>,
    ) -> Result<User, UserRepositoryError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch an account by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError>;

    /// All accounts ordered by id.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Apply `changes`; `None` when the account does not exist.
    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Remove an account; `false` when it did not exist.
    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError>;
}
