//! Treatment plan bookkeeping.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{PatientRepository, TreatmentPlanBook, TreatmentPlanRepository};
use crate::domain::service_support::{
    map_patient_repository_error, map_treatment_plan_repository_error, patient_not_found,
};
use crate::domain::{
    Error, PatientId, PatientReferenceLock, TreatmentPlan, TreatmentPlanChanges,
    TreatmentPlanDraft, TreatmentPlanId,
};

fn plan_not_found(id: TreatmentPlanId) -> Error {
    Error::not_found(format!("treatment plan {id} not found"))
}

/// Implements [`TreatmentPlanBook`]; plans always belong to a stored patient.
#[derive(Clone)]
pub struct TreatmentPlanService<T, P> {
    plans: Arc<T>,
    patients: Arc<P>,
    clock: Arc<dyn Clock>,
    references: PatientReferenceLock,
}

impl<T, P> TreatmentPlanService<T, P> {
    /// Create a treatment plan service.
    pub fn new(plans: Arc<T>, patients: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            plans,
            patients,
            clock,
            references: PatientReferenceLock::new(),
        }
    }

    /// Share `references` with the patient service writing to the same store.
    #[must_use]
    pub fn with_reference_lock(mut self, references: PatientReferenceLock) -> Self {
        self.references = references;
        self
    }
}

impl<T, P> TreatmentPlanService<T, P>
where
    P: PatientRepository,
{
    async fn ensure_patient(&self, id: PatientId) -> Result<(), Error> {
        self.patients
            .find_by_id(id)
            .await
            .map_err(map_patient_repository_error)?
            .map(drop)
            .ok_or_else(|| patient_not_found(id))
    }
}

#[async_trait]
impl<T, P> TreatmentPlanBook for TreatmentPlanService<T, P>
where
    T: TreatmentPlanRepository,
    P: PatientRepository,
{
    async fn list(&self) -> Result<Vec<TreatmentPlan>, Error> {
        self.plans
            .list()
            .await
            .map_err(map_treatment_plan_repository_error)
    }

    async fn list_for_patient(&self, patient_id: PatientId) -> Result<Vec<TreatmentPlan>, Error> {
        let plans = self
            .plans
            .list_for_patient(patient_id)
            .await
            .map_err(map_treatment_plan_repository_error)?;
        if plans.is_empty() {
            return Err(Error::not_found(format!(
                "no treatment plans found for patient {patient_id}"
            )));
        }
        Ok(plans)
    }

    async fn get(&self, id: TreatmentPlanId) -> Result<TreatmentPlan, Error> {
        self.plans
            .find_by_id(id)
            .await
            .map_err(map_treatment_plan_repository_error)?
            .ok_or_else(|| plan_not_found(id))
    }

    async fn create(&self, draft: TreatmentPlanDraft) -> Result<TreatmentPlan, Error> {
        let _referencing = self.references.referencing().await;
        self.ensure_patient(draft.patient_id).await?;
        let plan = self
            .plans
            .insert(draft, self.clock.utc())
            .await
            .map_err(map_treatment_plan_repository_error)?;
        info!(plan_id = %plan.id, patient_id = %plan.patient_id, "treatment plan recorded");
        Ok(plan)
    }

    async fn update(
        &self,
        id: TreatmentPlanId,
        changes: TreatmentPlanChanges,
    ) -> Result<TreatmentPlan, Error> {
        let _referencing = self.references.referencing().await;
        if let Some(patient_id) = changes.patient_id {
            self.ensure_patient(patient_id).await?;
        }
        self.plans
            .update(id, changes, self.clock.utc())
            .await
            .map_err(map_treatment_plan_repository_error)?
            .ok_or_else(|| plan_not_found(id))
    }

    async fn delete(&self, id: TreatmentPlanId) -> Result<(), Error> {
        let removed = self
            .plans
            .delete(id)
            .await
            .map_err(map_treatment_plan_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(plan_not_found(id))
        }
    }
}
