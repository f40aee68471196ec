//! Staff account administration.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::access::{Identity, ensure_not_self};
use crate::domain::ports::{UserAdministration, UserRepository};
use crate::domain::service_support::map_user_repository_error;
use crate::domain::{
    AccountChanges, AccountDraft, Error, NewUser, Password, PasswordHash, User, UserChanges,
    UserId,
};

fn hash_password(password: &Password) -> Result<PasswordHash, Error> {
    PasswordHash::generate(password)
        .map_err(|err| Error::internal(format!("failed to hash password: {err}")))
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// Implements [`UserAdministration`] over a [`UserRepository`].
#[derive(Clone)]
pub struct UserService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> UserService<U> {
    /// Create a user service stamping accounts with `clock`.
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

#[async_trait]
impl<U> UserAdministration for UserService<U>
where
    U: UserRepository,
{
    async fn register(&self, draft: AccountDraft) -> Result<User, Error> {
        let password_hash = hash_password(&draft.password)?;
        let new_user = NewUser {
            username: draft.username,
            email: draft.email,
            role: draft.role,
            password_hash,
        };
        let user = self
            .users
            .insert(new_user, self.clock.utc())
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id, role = %user.role, "account created");
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_repository_error)
    }

    async fn update(&self, id: UserId, changes: AccountChanges) -> Result<User, Error> {
        let password_hash = changes.password.as_ref().map(hash_password).transpose()?;
        let changes = UserChanges {
            username: changes.username,
            email: changes.email,
            role: changes.role,
            password_hash,
        };
        self.users
            .update(id, changes)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn delete(&self, actor: &Identity, target: UserId) -> Result<(), Error> {
        ensure_not_self(actor, target)?;
        let removed = self
            .users
            .delete(target)
            .await
            .map_err(map_user_repository_error)?;
        if !removed {
            return Err(user_not_found(target));
        }
        info!(user_id = %target, actor = %actor.user_id(), "account deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
