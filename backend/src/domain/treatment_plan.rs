//! Treatment plans attached to patients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{ValidationError, required_text};
use super::{PatientId, TreatmentPlanId};

const DIAGNOSIS_MAX: usize = 255;
const DETAILS_MAX: usize = 10_000;

/// Validate a diagnosis summary.
pub fn diagnosis(raw: &str) -> Result<String, ValidationError> {
    required_text("diagnosis", raw, DIAGNOSIS_MAX)
}

/// Validate treatment details.
pub fn treatment_details(raw: &str) -> Result<String, ValidationError> {
    required_text("treatmentDetails", raw, DETAILS_MAX)
}

/// Progress of a treatment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum TreatmentStatus {
    /// Not yet started.
    #[default]
    Pending,
    /// In progress.
    Ongoing,
    /// Finished.
    Completed,
}

/// Validated input for a new treatment plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentPlanDraft {
    pub patient_id: PatientId,
    pub diagnosis: String,
    pub treatment_details: String,
    pub status: TreatmentStatus,
}

/// A stored treatment plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentPlan {
    pub id: TreatmentPlanId,
    pub patient_id: PatientId,
    pub diagnosis: String,
    pub treatment_details: String,
    pub status: TreatmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial treatment plan update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreatmentPlanChanges {
    pub patient_id: Option<PatientId>,
    pub diagnosis: Option<String>,
    pub treatment_details: Option<String>,
    pub status: Option<TreatmentStatus>,
}

impl TreatmentPlanChanges {
    /// Apply supplied fields and stamp `updated_at`.
    pub fn apply_to(self, plan: &mut TreatmentPlan, at: DateTime<Utc>) {
        if let Some(patient_id) = self.patient_id {
            plan.patient_id = patient_id;
        }
        if let Some(diagnosis) = self.diagnosis {
            plan.diagnosis = diagnosis;
        }
        if let Some(treatment_details) = self.treatment_details {
            plan.treatment_details = treatment_details;
        }
        if let Some(status) = self.status {
            plan.status = status;
        }
        plan.updated_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("\"Pending\"", TreatmentStatus::Pending)]
    #[case("\"Ongoing\"", TreatmentStatus::Ongoing)]
    #[case("\"Completed\"", TreatmentStatus::Completed)]
    fn status_uses_capitalised_names(#[case] json: &str, #[case] expected: TreatmentStatus) {
        let parsed: TreatmentStatus = serde_json::from_str(json).expect("known status");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<TreatmentStatus>("\"Abandoned\"").is_err());
    }

    #[rstest]
    fn default_status_is_pending() {
        assert_eq!(TreatmentStatus::default(), TreatmentStatus::Pending);
    }
}
