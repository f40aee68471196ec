//! Driven port for treatment plan persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    PatientId, TreatmentPlan, TreatmentPlanChanges, TreatmentPlanDraft, TreatmentPlanId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by treatment plan repository adapters.
    pub enum TreatmentPlanRepositoryError {
        /// Backing store could not be reached.
        Connection { message: String } => "treatment plan repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "treatment plan repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TreatmentPlanRepository: Send + Sync {
    /// Store a new plan and assign its id.
    async fn insert(
        &self,
        draft: TreatmentPlanDraft,
        created_at: DateTime<Utc>,
    ) -> Result<TreatmentPlan, TreatmentPlanRepositoryError>;

    /// Fetch a plan by id.
    async fn find_by_id(
        &self,
        id: TreatmentPlanId,
    ) -> Result<Option<TreatmentPlan>, TreatmentPlanRepositoryError>;

    /// All plans ordered by id.
    async fn list(&self) -> Result<Vec<TreatmentPlan>, TreatmentPlanRepositoryError>;

    /// Plans for one patient ordered by id.
    async fn list_for_patient(
        &self,
        patient_id: PatientId,
    ) -> Result<Vec<TreatmentPlan>, TreatmentPlanRepositoryError>;

    /// Apply `changes`; `None` when the plan does not exist.
    async fn update(
        &self,
        id: TreatmentPlanId,
        changes: TreatmentPlanChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<TreatmentPlan>, TreatmentPlanRepositoryError>;

    /// Remove a plan; `false` when it did not exist.
    async fn delete(&self, id: TreatmentPlanId) -> Result<bool, TreatmentPlanRepositoryError>;
}
