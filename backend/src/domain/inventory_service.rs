//! Stock tracking.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{InventoryLedger, InventoryRepository};
use crate::domain::service_support::map_inventory_repository_error;
use crate::domain::{Error, InventoryChanges, InventoryItem, InventoryItemDraft, InventoryItemId};

fn item_not_found(id: InventoryItemId) -> Error {
    Error::not_found(format!("inventory item {id} not found"))
}

/// Implements [`InventoryLedger`] over an [`InventoryRepository`].
#[derive(Clone)]
pub struct InventoryService<R> {
    items: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> InventoryService<R> {
    /// Create an inventory service.
    pub fn new(items: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { items, clock }
    }
}

#[async_trait]
impl<R> InventoryLedger for InventoryService<R>
where
    R: InventoryRepository,
{
    async fn list(&self) -> Result<Vec<InventoryItem>, Error> {
        self.items.list().await.map_err(map_inventory_repository_error)
    }

    async fn get(&self, id: InventoryItemId) -> Result<InventoryItem, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(map_inventory_repository_error)?
            .ok_or_else(|| item_not_found(id))
    }

    async fn create(&self, draft: InventoryItemDraft) -> Result<InventoryItem, Error> {
        let item = self
            .items
            .insert(draft, self.clock.utc())
            .await
            .map_err(map_inventory_repository_error)?;
        info!(item_id = %item.id, quantity = item.quantity, "inventory item added");
        Ok(item)
    }

    async fn update(
        &self,
        id: InventoryItemId,
        changes: InventoryChanges,
    ) -> Result<InventoryItem, Error> {
        let item = self
            .items
            .update(id, changes, self.clock.utc())
            .await
            .map_err(map_inventory_repository_error)?
            .ok_or_else(|| item_not_found(id))?;
        if item.is_low_stock() {
            warn!(
                item_id = %item.id,
                quantity = item.quantity,
                threshold = item.threshold,
                "inventory item below threshold"
            );
        }
        Ok(item)
    }

    async fn delete(&self, id: InventoryItemId) -> Result<(), Error> {
        let removed = self
            .items
            .delete(id)
            .await
            .map_err(map_inventory_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(item_not_found(id))
        }
    }

    async fn low_stock(&self) -> Result<Vec<InventoryItem>, Error> {
        self.items
            .list_low_stock()
            .await
            .map_err(map_inventory_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{InventoryRepositoryError, MockInventoryRepository};
    use crate::test_support::FixtureClock;
    use rstest::rstest;

    fn service(repo: MockInventoryRepository) -> InventoryService<MockInventoryRepository> {
        InventoryService::new(Arc::new(repo), Arc::new(FixtureClock::default()))
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_item_is_not_found() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_update().return_once(|_, _, _| Ok(None));

        let err = service(repo)
            .update(
                InventoryItemId::new(3).expect("valid id"),
                InventoryChanges::default(),
            )
            .await
            .expect_err("missing");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(InventoryRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(InventoryRepositoryError::query("bad"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_failures_are_mapped(
        #[case] failure: InventoryRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockInventoryRepository::new();
        repo.expect_list_low_stock().return_once(move || Err(failure));

        let err = service(repo).low_stock().await.expect_err("failure");

        assert_eq!(err.code(), expected);
    }
}
