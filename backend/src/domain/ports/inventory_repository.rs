//! Driven port for stock item persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{InventoryChanges, InventoryItem, InventoryItemDraft, InventoryItemId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by inventory repository adapters.
    pub enum InventoryRepositoryError {
        /// Backing store could not be reached.
        Connection { message: String } => "inventory repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "inventory repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Store a new item and assign its id.
    async fn insert(
        &self,
        draft: InventoryItemDraft,
        created_at: DateTime<Utc>,
    ) -> Result<InventoryItem, InventoryRepositoryError>;

    /// Fetch an item by id.
    async fn find_by_id(
        &self,
        id: InventoryItemId,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError>;

    /// All items ordered by id.
    async fn list(&self) -> Result<Vec<InventoryItem>, InventoryRepositoryError>;

    /// Items whose quantity is below their threshold, ordered by id.
    async fn list_low_stock(&self) -> Result<Vec<InventoryItem>, InventoryRepositoryError>;

    /// Apply `changes`; `None` when the item does not exist.
    async fn update(
        &self,
        id: InventoryItemId,
        changes: InventoryChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError>;

    /// Remove an item; `false` when it did not exist.
    async fn delete(&self, id: InventoryItemId) -> Result<bool, InventoryRepositoryError>;
}
