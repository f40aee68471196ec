//! Driving port for treatment plans.

use async_trait::async_trait;

use crate::domain::{
    Error, PatientId, TreatmentPlan, TreatmentPlanChanges, TreatmentPlanDraft, TreatmentPlanId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TreatmentPlanBook: Send + Sync {
    async fn list(&self) -> Result<Vec<TreatmentPlan>, Error>;

    /// Plans for one patient; not found when the patient has none.
    async fn list_for_patient(&self, patient_id: PatientId) -> Result<Vec<TreatmentPlan>, Error>;

    async fn get(&self, id: TreatmentPlanId) -> Result<TreatmentPlan, Error>;

    /// Record a plan for an existing patient.
    async fn create(&self, draft: TreatmentPlanDraft) -> Result<TreatmentPlan, Error>;

    async fn update(
        &self,
        id: TreatmentPlanId,
        changes: TreatmentPlanChanges,
    ) -> Result<TreatmentPlan, Error>;

    async fn delete(&self, id: TreatmentPlanId) -> Result<(), Error>;
}
