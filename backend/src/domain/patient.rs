//! Patient records.
//!
//! Contact number, email and medical history are sensitive: repositories
//! only ever see them as [`EncryptedField`]s. [`Patient`] is the decrypted
//! view handed to adapters.

use chrono::{DateTime, NaiveDate, Utc};

use super::appointment::Appointment;
use super::cipher::EncryptedField;
use super::treatment_plan::TreatmentPlan;
use super::validation::{ValidationError, optional_text, required_text};
use super::{EmailAddress, PatientId};

const NAME_MAX: usize = 50;
const CONTACT_NUMBER_MAX: usize = 32;
const MEDICAL_HISTORY_MAX: usize = 10_000;

/// Validate a first or last name.
pub fn patient_name(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    required_text(field, raw, NAME_MAX)
}

/// Validate a contact telephone number.
pub fn contact_number(raw: &str) -> Result<String, ValidationError> {
    required_text("contactNumber", raw, CONTACT_NUMBER_MAX)
}

/// Validate a patient email address.
pub fn patient_email(raw: &str) -> Result<String, ValidationError> {
    EmailAddress::new(raw).map(|email| email.as_ref().to_owned())
}

/// Validate free-text medical history; blank input means none.
pub fn medical_history(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    optional_text("medicalHistory", raw, MEDICAL_HISTORY_MAX)
}

/// Non-sensitive identifying attributes, stored in the clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientProfile {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl PatientProfile {
    /// Case-insensitive substring match on first or last name.
    #[must_use]
    pub fn name_contains(&self, fragment: &str) -> bool {
        let needle = fragment.to_lowercase();
        self.first_name.to_lowercase().contains(&needle)
            || self.last_name.to_lowercase().contains(&needle)
    }
}

/// Sensitive attributes in plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct SensitiveDetails {
    pub contact_number: String,
    pub email: String,
    pub medical_history: Option<String>,
}

impl std::fmt::Debug for SensitiveDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SensitiveDetails(<redacted>)")
    }
}

/// Sensitive attributes as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedDetails {
    pub contact_number: EncryptedField,
    pub email: EncryptedField,
    pub medical_history: Option<EncryptedField>,
}

/// Validated input for a new patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDraft {
    pub profile: PatientProfile,
    pub details: SensitiveDetails,
}

/// Encrypted patient awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatientRecord {
    pub profile: PatientProfile,
    pub sealed: SealedDetails,
    pub created_at: DateTime<Utc>,
}

/// Stored patient row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    pub id: PatientId,
    pub profile: PatientProfile,
    pub sealed: SealedDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Decrypted patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: PatientId,
    pub profile: PatientProfile,
    pub details: SensitiveDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated partial update. Omitted sensitive fields keep their ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatientChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub medical_history: Option<String>,
}

impl PatientChanges {
    /// Overwrite the supplied clear-text profile fields.
    pub fn apply_profile(&self, profile: &mut PatientProfile) {
        if let Some(first_name) = &self.first_name {
            first_name.clone_into(&mut profile.first_name);
        }
        if let Some(last_name) = &self.last_name {
            last_name.clone_into(&mut profile.last_name);
        }
        if let Some(date_of_birth) = self.date_of_birth {
            profile.date_of_birth = date_of_birth;
        }
    }
}

/// A patient with their appointments and treatment plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientOverview {
    pub patient: Patient,
    pub appointments: Vec<Appointment>,
    pub treatment_plans: Vec<TreatmentPlan>,
}
