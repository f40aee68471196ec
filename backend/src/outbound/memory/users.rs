//! In-memory user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{NewUser, User, UserChanges, UserId};

use super::{SEQUENCE_EXHAUSTED, Table};

/// Staff accounts keyed by id; usernames are unique.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn username_taken(table: &Table<User>, username: &str, except: Option<UserId>) -> bool {
    table
        .rows()
        .any(|user| user.username.as_ref() == username && Some(user.id) != except)
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(
        &self,
        user: NewUser,
        created_at: DateTime<Utc>,
    ) -> Result<User, UserRepositoryError> {
        let mut table = self.table.write().await;
        if username_taken(&table, user.username.as_ref(), None) {
            return Err(UserRepositoryError::duplicate_username(
                user.username.as_ref(),
            ));
        }
        let raw_id = table
            .allocate()
            .ok_or_else(|| UserRepositoryError::query(SEQUENCE_EXHAUSTED))?;
        let id = UserId::new(raw_id).map_err(|err| UserRepositoryError::query(err.to_string()))?;
        let stored = User {
            id,
            username: user.username,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
            created_at,
        };
        table.put(raw_id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.table.read().await.get(id.get()).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .table
            .read()
            .await
            .rows()
            .find(|user| user.username.as_ref() == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.table.read().await.rows().cloned().collect())
    }

    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut table = self.table.write().await;
        if let Some(username) = &changes.username {
            if username_taken(&table, username.as_ref(), Some(id)) {
                return Err(UserRepositoryError::duplicate_username(username.as_ref()));
            }
        }
        Ok(table.get_mut(id.get()).map(|user| {
            changes.apply_to(user);
            user.clone()
        }))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        Ok(self.table.write().await.remove(id.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::Role;
    use crate::domain::{EmailAddress, PasswordHash, Username};
    use rstest::{fixture, rstest};

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: Username::new(name).expect("valid username"),
            email: EmailAddress::new(format!("{name}@example.org")).expect("valid email"),
            role: Role::user(),
            password_hash: PasswordHash::from_phc("$argon2id$stub".to_owned()),
        }
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_usernames_are_rejected(now: DateTime<Utc>) {
        let repo = MemoryUserRepository::new();
        repo.insert(new_user("nurse"), now).await.expect("first insert");

        let err = repo
            .insert(new_user("nurse"), now)
            .await
            .expect_err("duplicate");

        assert_eq!(err, UserRepositoryError::duplicate_username("nurse"));
    }

    #[rstest]
    #[tokio::test]
    async fn rename_onto_existing_username_is_rejected(now: DateTime<Utc>) {
        let repo = MemoryUserRepository::new();
        repo.insert(new_user("nurse"), now).await.expect("insert");
        let other = repo.insert(new_user("doctor"), now).await.expect("insert");

        let changes = UserChanges {
            username: Some(Username::new("nurse").expect("valid username")),
            ..UserChanges::default()
        };
        let err = repo.update(other.id, changes).await.expect_err("taken");

        assert!(matches!(err, UserRepositoryError::DuplicateUsername { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn lookup_by_username_and_delete(now: DateTime<Utc>) {
        let repo = MemoryUserRepository::new();
        let user = repo.insert(new_user("nurse"), now).await.expect("insert");

        let found = repo.find_by_username("nurse").await.expect("lookup");
        assert_eq!(found.map(|u| u.id), Some(user.id));

        assert!(repo.delete(user.id).await.expect("delete"));
        assert!(!repo.delete(user.id).await.expect("second delete"));
        assert!(repo.list().await.expect("list").is_empty());
    }
}
