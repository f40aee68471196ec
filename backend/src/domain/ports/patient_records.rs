//! Driving port for patient records.
//!
//! Implementations own the encryption boundary: callers exchange plaintext
//! [`Patient`] values and never see ciphertext.

use async_trait::async_trait;

use crate::domain::{Error, Patient, PatientChanges, PatientDraft, PatientId, PatientOverview};

/// Patient use-cases available to clinic staff.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientRecords: Send + Sync {
    /// All patients, decrypted, ordered by id.
    async fn list(&self) -> Result<Vec<Patient>, Error>;

    /// One patient, decrypted.
    async fn get(&self, id: PatientId) -> Result<Patient, Error>;

    /// Seal and store a new patient.
    async fn create(&self, draft: PatientDraft) -> Result<PatientId, Error>;

    /// Apply `changes`; omitted sensitive fields keep their stored ciphertext.
    async fn update(&self, id: PatientId, changes: PatientChanges) -> Result<Patient, Error>;

    /// Remove a patient that nothing references.
    async fn delete(&self, id: PatientId) -> Result<(), Error>;

    /// First patient whose name matches, with appointments and plans.
    async fn search(&self, name: &str) -> Result<PatientOverview, Error>;
}
