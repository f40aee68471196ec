//! Driven port for appointment persistence.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::{Appointment, AppointmentChanges, AppointmentDraft, AppointmentId, PatientId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentRepositoryError {
        /// Backing store could not be reached.
        Connection { message: String } => "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "appointment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Store a new appointment and assign its id.
    async fn insert(
        &self,
        draft: AppointmentDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Appointment, AppointmentRepositoryError>;

    /// Fetch an appointment by id.
    async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// All appointments ordered by id.
    async fn list(&self) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// Appointments for one patient ordered by date.
    async fn list_for_patient(
        &self,
        patient_id: PatientId,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// Appointments with `from <= date <= until`, ordered by date.
    async fn list_between(
        &self,
        from: NaiveDateTime,
        until: NaiveDateTime,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// Apply `changes`; `None` when the appointment does not exist.
    async fn update(
        &self,
        id: AppointmentId,
        changes: AppointmentChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// Remove an appointment; `false` when it did not exist.
    async fn delete(&self, id: AppointmentId) -> Result<bool, AppointmentRepositoryError>;
}
