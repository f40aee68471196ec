//! Driving port for appointments.

use async_trait::async_trait;

use crate::domain::{Appointment, AppointmentChanges, AppointmentDraft, AppointmentId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentBook: Send + Sync {
    /// All appointments ordered by id.
    async fn list(&self) -> Result<Vec<Appointment>, Error>;

    async fn get(&self, id: AppointmentId) -> Result<Appointment, Error>;

    /// Book an appointment for an existing patient.
    async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, Error>;

    async fn update(
        &self,
        id: AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<Appointment, Error>;

    async fn delete(&self, id: AppointmentId) -> Result<(), Error>;

    /// Appointments from now until the end of the upcoming window, soonest first.
    async fn upcoming(&self) -> Result<Vec<Appointment>, Error>;
}
