//! Driving port for staff account management.

use async_trait::async_trait;

use crate::domain::access::Identity;
use crate::domain::{AccountChanges, AccountDraft, Error, User, UserId};

/// Administrative use-cases over staff accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdministration: Send + Sync {
    /// Create an account; conflicts when the username is taken.
    async fn register(&self, draft: AccountDraft) -> Result<User, Error>;

    /// All accounts ordered by id.
    async fn list(&self) -> Result<Vec<User>, Error>;

    /// Apply `changes` to an existing account.
    async fn update(&self, id: UserId, changes: AccountChanges) -> Result<User, Error>;

    /// Delete `target` on behalf of `actor`. Self-deletion is refused.
    async fn delete(&self, actor: &Identity, target: UserId) -> Result<(), Error>;
}
