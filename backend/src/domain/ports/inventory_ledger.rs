//! Driving port for stock items.

use async_trait::async_trait;

use crate::domain::{Error, InventoryChanges, InventoryItem, InventoryItemDraft, InventoryItemId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    async fn list(&self) -> Result<Vec<InventoryItem>, Error>;

    async fn get(&self, id: InventoryItemId) -> Result<InventoryItem, Error>;

    async fn create(&self, draft: InventoryItemDraft) -> Result<InventoryItem, Error>;

    async fn update(
        &self,
        id: InventoryItemId,
        changes: InventoryChanges,
    ) -> Result<InventoryItem, Error>;

    async fn delete(&self, id: InventoryItemId) -> Result<(), Error>;

    /// Items whose quantity has fallen below their threshold.
    async fn low_stock(&self) -> Result<Vec<InventoryItem>, Error>;
}
