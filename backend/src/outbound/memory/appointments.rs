//! In-memory appointment repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{Appointment, AppointmentChanges, AppointmentDraft, AppointmentId, PatientId};

use super::{SEQUENCE_EXHAUSTED, Table};

#[derive(Debug, Default)]
pub struct MemoryAppointmentRepository {
    table: RwLock<Table<Appointment>>,
}

impl MemoryAppointmentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_date<'a>(rows: impl Iterator<Item = &'a Appointment>) -> Vec<Appointment> {
    let mut selected: Vec<Appointment> = rows.cloned().collect();
    selected.sort_by_key(|appointment| (appointment.appointment_date, appointment.id));
    selected
}

#[async_trait]
impl AppointmentRepository for MemoryAppointmentRepository {
    async fn insert(
        &self,
        draft: AppointmentDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Appointment, AppointmentRepositoryError> {
        let mut table = self.table.write().await;
        let raw_id = table
            .allocate()
            .ok_or_else(|| AppointmentRepositoryError::query(SEQUENCE_EXHAUSTED))?;
        let id = AppointmentId::new(raw_id)
            .map_err(|err| AppointmentRepositoryError::query(err.to_string()))?;
        let appointment = Appointment {
            id,
            patient_id: draft.patient_id,
            appointment_date: draft.appointment_date,
            notes: draft.notes,
            created_at,
            updated_at: None,
        };
        table.put(raw_id, appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        Ok(self.table.read().await.get(id.get()).cloned())
    }

    async fn list(&self) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        Ok(self.table.read().await.rows().cloned().collect())
    }

    async fn list_for_patient(
        &self,
        patient_id: PatientId,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let table = self.table.read().await;
        Ok(by_date(
            table
                .rows()
                .filter(|appointment| appointment.patient_id == patient_id),
        ))
    }

    async fn list_between(
        &self,
        from: NaiveDateTime,
        until: NaiveDateTime,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let table = self.table.read().await;
        Ok(by_date(table.rows().filter(|appointment| {
            (from..=until).contains(&appointment.appointment_date)
        })))
    }

    async fn update(
        &self,
        id: AppointmentId,
        changes: AppointmentChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut table = self.table.write().await;
        Ok(table.get_mut(id.get()).map(|appointment| {
            changes.apply_to(appointment, updated_at);
            appointment.clone()
        }))
    }

    async fn delete(&self, id: AppointmentId) -> Result<bool, AppointmentRepositoryError> {
        Ok(self.table.write().await.remove(id.get()))
    }
}
