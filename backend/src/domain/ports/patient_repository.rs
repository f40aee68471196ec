//! Driven port for patient persistence.
//!
//! Adapters receive sensitive attributes only in sealed form.

use async_trait::async_trait;

use crate::domain::{NewPatientRecord, PatientId, PatientRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by patient repository adapters.
    pub enum PatientRepositoryError {
        /// Backing store could not be reached.
        Connection { message: String } => "patient repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "patient repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Store a new patient and assign its id.
    async fn insert(&self, patient: NewPatientRecord)
    -> Result<PatientRecord, PatientRepositoryError>;

    /// Fetch a patient by id.
    async fn find_by_id(&self, id: PatientId)
    -> Result<Option<PatientRecord>, PatientRepositoryError>;

    /// All patients ordered by id.
    async fn list(&self) -> Result<Vec<PatientRecord>, PatientRepositoryError>;

    /// Replace a stored row wholesale; `false` when it does not exist.
    async fn replace(&self, record: PatientRecord) -> Result<bool, PatientRepositoryError>;

    /// Remove a patient; `false` when it did not exist.
    async fn delete(&self, id: PatientId) -> Result<bool, PatientRepositoryError>;

    /// Lowest-id patient whose first or last name contains `fragment`,
    /// ignoring case.
    async fn find_first_by_name(
        &self,
        fragment: &str,
    ) -> Result<Option<PatientRecord>, PatientRepositoryError>;
}
