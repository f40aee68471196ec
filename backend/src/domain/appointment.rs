//! Patient appointments.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use super::validation::{ValidationError, optional_text};
use super::{AppointmentId, PatientId};

const NOTES_MAX: usize = 2_000;

const UPCOMING_WINDOW_DAYS: i64 = 2;

/// How far ahead the dashboard looks for appointments.
#[must_use]
pub fn upcoming_window() -> TimeDelta {
    TimeDelta::days(UPCOMING_WINDOW_DAYS)
}

/// Validate optional appointment notes.
pub fn appointment_notes(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    optional_text("notes", raw, NOTES_MAX)
}

/// Validated input for a new appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub patient_id: PatientId,
    pub appointment_date: NaiveDateTime,
    pub notes: Option<String>,
}

/// A scheduled appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub appointment_date: NaiveDateTime,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial appointment update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppointmentChanges {
    pub patient_id: Option<PatientId>,
    pub appointment_date: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

impl AppointmentChanges {
    /// Apply supplied fields and stamp `updated_at`.
    pub fn apply_to(self, appointment: &mut Appointment, at: DateTime<Utc>) {
        if let Some(patient_id) = self.patient_id {
            appointment.patient_id = patient_id;
        }
        if let Some(appointment_date) = self.appointment_date {
            appointment.appointment_date = appointment_date;
        }
        if let Some(notes) = self.notes {
            appointment.notes = Some(notes);
        }
        appointment.updated_at = Some(at);
    }
}
