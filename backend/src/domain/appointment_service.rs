//! Appointment booking.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::appointment::upcoming_window;
use crate::domain::ports::{AppointmentBook, AppointmentRepository, PatientRepository};
use crate::domain::service_support::{
    map_appointment_repository_error, map_patient_repository_error, patient_not_found,
};
use crate::domain::{
    Appointment, AppointmentChanges, AppointmentDraft, AppointmentId, Error, PatientId,
    PatientReferenceLock,
};

fn appointment_not_found(id: AppointmentId) -> Error {
    Error::not_found(format!("appointment {id} not found"))
}

/// Implements [`AppointmentBook`]; every booking must name a stored patient.
#[derive(Clone)]
pub struct AppointmentService<A, P> {
    appointments: Arc<A>,
    patients: Arc<P>,
    clock: Arc<dyn Clock>,
    references: PatientReferenceLock,
}

impl<A, P> AppointmentService<A, P> {
    /// Create an appointment service.
    pub fn new(appointments: Arc<A>, patients: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            appointments,
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

impl<A, P> AppointmentService<A, P>
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
impl<A, P> AppointmentBook for AppointmentService<A, P>
where
    A: AppointmentRepository,
    P: PatientRepository,
{
    async fn list(&self) -> Result<Vec<Appointment>, Error> {
        self.appointments
            .list()
            .await
            .map_err(map_appointment_repository_error)
    }

    async fn get(&self, id: AppointmentId) -> Result<Appointment, Error> {
        self.appointments
            .find_by_id(id)
            .await
            .map_err(map_appointment_repository_error)?
            .ok_or_else(|| appointment_not_found(id))
    }

    async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, Error> {
        let _referencing = self.references.referencing().await;
        self.ensure_patient(draft.patient_id).await?;
        let appointment = self
            .appointments
            .insert(draft, self.clock.utc())
            .await
            .map_err(map_appointment_repository_error)?;
        info!(
            appointment_id = %appointment.id,
            patient_id = %appointment.patient_id,
            "appointment booked"
        );
        Ok(appointment)
    }

    async fn update(
        &self,
        id: AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<Appointment, Error> {
        let _referencing = self.references.referencing().await;
        if let Some(patient_id) = changes.patient_id {
            self.ensure_patient(patient_id).await?;
        }
        self.appointments
            .update(id, changes, self.clock.utc())
            .await
            .map_err(map_appointment_repository_error)?
            .ok_or_else(|| appointment_not_found(id))
    }

    async fn delete(&self, id: AppointmentId) -> Result<(), Error> {
        let removed = self
            .appointments
            .delete(id)
            .await
            .map_err(map_appointment_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(appointment_not_found(id))
        }
    }

    async fn upcoming(&self) -> Result<Vec<Appointment>, Error> {
        let now = self.clock.utc().naive_utc();
        self.appointments
            .list_between(now, now + upcoming_window())
            .await
            .map_err(map_appointment_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockAppointmentRepository, MockPatientRepository};
    use crate::test_support::FixtureClock;
    use chrono::TimeDelta;
    use rstest::rstest;

    fn draft() -> AppointmentDraft {
        AppointmentDraft {
            patient_id: PatientId::new(2).expect("valid id"),
            appointment_date: FixtureClock::default().utc().naive_utc() + TimeDelta::hours(3),
            notes: Some("follow-up".to_owned()),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_requires_existing_patient() {
        let mut patients = MockPatientRepository::new();
        patients.expect_find_by_id().return_once(|_| Ok(None));
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_insert().times(0);

        let err = AppointmentService::new(
            Arc::new(appointments),
            Arc::new(patients),
            Arc::new(FixtureClock::default()),
        )
        .create(draft())
        .await
        .expect_err("unknown patient");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn upcoming_spans_two_days_from_now() {
        let now = FixtureClock::default().utc().naive_utc();
        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_list_between()
            .times(1)
            .withf(move |from, until| *from == now && *until == now + TimeDelta::days(2))
            .return_once(|_, _| Ok(Vec::new()));

        let upcoming = AppointmentService::new(
            Arc::new(appointments),
            Arc::new(MockPatientRepository::new()),
            Arc::new(FixtureClock::default()),
        )
        .upcoming()
        .await
        .expect("upcoming loads");

        assert!(upcoming.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_missing_appointment_is_not_found() {
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_delete().return_once(|_| Ok(false));

        let err = AppointmentService::new(
            Arc::new(appointments),
            Arc::new(MockPatientRepository::new()),
            Arc::new(FixtureClock::default()),
        )
        .delete(AppointmentId::new(8).expect("valid id"))
        .await
        .expect_err("missing");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
