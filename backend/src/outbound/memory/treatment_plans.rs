//! In-memory treatment plan repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{TreatmentPlanRepository, TreatmentPlanRepositoryError};
use crate::domain::{
    PatientId, TreatmentPlan, TreatmentPlanChanges, TreatmentPlanDraft, TreatmentPlanId,
};

use super::{SEQUENCE_EXHAUSTED, Table};

#[derive(Debug, Default)]
pub struct MemoryTreatmentPlanRepository {
    table: RwLock<Table<TreatmentPlan>>,
}

impl MemoryTreatmentPlanRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TreatmentPlanRepository for MemoryTreatmentPlanRepository {
    async fn insert(
        &self,
        draft: TreatmentPlanDraft,
        created_at: DateTime<Utc>,
    ) -> Result<TreatmentPlan, TreatmentPlanRepositoryError> {
        let mut table = self.table.write().await;
        let raw_id = table
            .allocate()
            .ok_or_else(|| TreatmentPlanRepositoryError::query(SEQUENCE_EXHAUSTED))?;
        let id = TreatmentPlanId::new(raw_id)
            .map_err(|err| TreatmentPlanRepositoryError::query(err.to_string()))?;
        let plan = TreatmentPlan {
            id,
            patient_id: draft.patient_id,
            diagnosis: draft.diagnosis,
            treatment_details: draft.treatment_details,
            status: draft.status,
            created_at,
            updated_at: None,
        };
        table.put(raw_id, plan.clone());
        Ok(plan)
    }

    async fn find_by_id(
        &self,
        id: TreatmentPlanId,
    ) -> Result<Option<TreatmentPlan>, TreatmentPlanRepositoryError> {
        Ok(self.table.read().await.get(id.get()).cloned())
    }

    async fn list(&self) -> Result<Vec<TreatmentPlan>, TreatmentPlanRepositoryError> {
        Ok(self.table.read().await.rows().cloned().collect())
    }

    async fn list_for_patient(
        &self,
        patient_id: PatientId,
    ) -> Result<Vec<TreatmentPlan>, TreatmentPlanRepositoryError> {
        Ok(self
            .table
            .read()
            .await
            .rows()
            .filter(|plan| plan.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: TreatmentPlanId,
        changes: TreatmentPlanChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<TreatmentPlan>, TreatmentPlanRepositoryError> {
        let mut table = self.table.write().await;
        Ok(table.get_mut(id.get()).map(|plan| {
            changes.apply_to(plan, updated_at);
            plan.clone()
        }))
    }

    async fn delete(&self, id: TreatmentPlanId) -> Result<bool, TreatmentPlanRepositoryError> {
        Ok(self.table.write().await.remove(id.get()))
    }
}
