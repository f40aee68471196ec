//! In-memory inventory repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{InventoryRepository, InventoryRepositoryError};
use crate::domain::{InventoryChanges, InventoryItem, InventoryItemDraft, InventoryItemId};

use super::{SEQUENCE_EXHAUSTED, Table};

#[derive(Debug, Default)]
pub struct MemoryInventoryRepository {
    table: RwLock<Table<InventoryItem>>,
}

impl MemoryInventoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryRepository for MemoryInventoryRepository {
    async fn insert(
        &self,
        draft: InventoryItemDraft,
        created_at: DateTime<Utc>,
    ) -> Result<InventoryItem, InventoryRepositoryError> {
        let mut table = self.table.write().await;
        let raw_id = table
            .allocate()
            .ok_or_else(|| InventoryRepositoryError::query(SEQUENCE_EXHAUSTED))?;
        let id = InventoryItemId::new(raw_id)
            .map_err(|err| InventoryRepositoryError::query(err.to_string()))?;
        let item = InventoryItem {
            id,
            name: draft.name,
            description: draft.description,
            quantity: draft.quantity,
            threshold: draft.threshold,
            unit: draft.unit,
            created_at,
            updated_at: None,
        };
        table.put(raw_id, item.clone());
        Ok(item)
    }

    async fn find_by_id(
        &self,
        id: InventoryItemId,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError> {
        Ok(self.table.read().await.get(id.get()).cloned())
    }

    async fn list(&self) -> Result<Vec<InventoryItem>, InventoryRepositoryError> {
        Ok(self.table.read().await.rows().cloned().collect())
    }

    async fn list_low_stock(&self) -> Result<Vec<InventoryItem>, InventoryRepositoryError> {
        Ok(self
            .table
            .read()
            .await
            .rows()
            .filter(|item| item.is_low_stock())
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: InventoryItemId,
        changes: InventoryChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError> {
        let mut table = self.table.write().await;
        Ok(table.get_mut(id.get()).map(|item| {
            changes.apply_to(item, updated_at);
            item.clone()
        }))
    }

    async fn delete(&self, id: InventoryItemId) -> Result<bool, InventoryRepositoryError> {
        Ok(self.table.write().await.remove(id.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::DEFAULT_THRESHOLD;
    use rstest::rstest;

    fn draft(name: &str, quantity: u32) -> InventoryItemDraft {
        InventoryItemDraft {
            name: name.to_owned(),
            description: None,
            quantity,
            threshold: DEFAULT_THRESHOLD,
            unit: Some("box".to_owned()),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn low_stock_excludes_items_at_threshold() {
        let repo = MemoryInventoryRepository::new();
        let created = DateTime::from_timestamp(0, 0).expect("epoch");
        repo.insert(draft("gauze", 24), created).await.expect("insert");
        repo.insert(draft("gloves", 25), created).await.expect("insert");
        repo.insert(draft("masks", 0), created).await.expect("insert");

        let low: Vec<String> = repo
            .list_low_stock()
            .await
            .expect("low stock")
            .into_iter()
            .map(|item| item.name)
            .collect();

        assert_eq!(low, vec!["gauze".to_owned(), "masks".to_owned()]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_stamps_modification_time() {
        let repo = MemoryInventoryRepository::new();
        let created = DateTime::from_timestamp(0, 0).expect("epoch");
        let later = DateTime::from_timestamp(60, 0).expect("valid timestamp");
        let item = repo.insert(draft("gauze", 5), created).await.expect("insert");

        let changes = InventoryChanges {
            quantity: Some(50),
            ..InventoryChanges::default()
        };
        let updated = repo
            .update(item.id, changes, later)
            .await
            .expect("update")
            .expect("item exists");

        assert_eq!(updated.quantity, 50);
        assert_eq!(updated.updated_at, Some(later));
        assert!(!updated.is_low_stock());
    }
}
