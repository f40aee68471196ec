//! Patient records behind the field cipher.
//!
//! Contact number, email, and medical history are sealed before they reach
//! the repository and opened only on the way out. A record whose ciphertext
//! fails authentication is reported as an internal error and never returned
//! partially decrypted.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::cipher::{
    DecryptionError, EncryptedField, EncryptionError, FieldCipher, SensitiveValue,
};
use crate::domain::ports::{
    AppointmentRepository, PatientRecords, PatientRepository, TreatmentPlanRepository,
};
use crate::domain::service_support::{
    map_appointment_repository_error, map_patient_repository_error,
    map_treatment_plan_repository_error, patient_not_found,
};
use crate::domain::{
    Error, NewPatientRecord, PatientReferenceLock, Patient, PatientChanges, PatientDraft, PatientId, PatientOverview,
    PatientRecord, SealedDetails, SensitiveDetails,
};

fn encryption_failed(err: EncryptionError) -> Error {
    error!(error = %err, "patient field encryption failed");
    Error::internal("failed to encrypt patient record")
}

/// Implements [`PatientRecords`] with encryption at the repository boundary.
#[derive(Clone)]
pub struct PatientService<P, A, T> {
    patients: Arc<P>,
    appointments: Arc<A>,
    plans: Arc<T>,
    cipher: Arc<FieldCipher>,
    clock: Arc<dyn Clock>,
    references: PatientReferenceLock,
}

impl<P, A, T> PatientService<P, A, T> {
    /// Create a patient service.
    ///
    /// Appointment and plan repositories are consulted for search results and
    /// to refuse deleting a patient that is still referenced.
    pub fn new(
        patients: Arc<P>,
        appointments: Arc<A>,
        plans: Arc<T>,
        cipher: Arc<FieldCipher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            patients,
            appointments,
            plans,
            cipher,
            clock,
            references: PatientReferenceLock::new(),
        }
    }

    /// Share `references` with the appointment and treatment plan services
    /// writing to the same store.
    #[must_use]
    pub fn with_reference_lock(mut self, references: PatientReferenceLock) -> Self {
        self.references = references;
        self
    }

    fn seal_required(&self, value: SensitiveValue) -> Result<EncryptedField, Error> {
        self.cipher
            .seal(Some(value))
            .and_then(|field| field.ok_or(EncryptionError))
            .map_err(encryption_failed)
    }

    fn seal_details(&self, details: SensitiveDetails) -> Result<SealedDetails, Error> {
        Ok(SealedDetails {
            contact_number: self.seal_required(details.contact_number.into())?,
            email: self.seal_required(details.email.into())?,
            medical_history: self
                .cipher
                .seal(details.medical_history.map(SensitiveValue::from))
                .map_err(encryption_failed)?,
        })
    }

    fn open_details(&self, sealed: &SealedDetails) -> Result<SensitiveDetails, DecryptionError> {
        let open = |field: &EncryptedField| {
            self.cipher
                .decrypt(Some(field))
                .map(Option::unwrap_or_default)
        };
        Ok(SensitiveDetails {
            contact_number: open(&sealed.contact_number)?,
            email: open(&sealed.email)?,
            medical_history: self.cipher.decrypt(sealed.medical_history.as_ref())?,
        })
    }

    fn open(&self, record: PatientRecord) -> Result<Patient, Error> {
        let details = self.open_details(&record.sealed).map_err(|err| {
            error!(patient_id = %record.id, error = %err, "stored patient fields failed to decrypt");
            Error::internal("failed to decrypt patient record")
        })?;
        Ok(Patient {
            id: record.id,
            profile: record.profile,
            details,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Merge `changes` into the stored ciphertext. Fields the caller omitted
    /// pass through as already-sealed values.
    fn reseal(&self, sealed: SealedDetails, changes: PatientChanges) -> Result<SealedDetails, Error> {
        let contact_number = changes
            .contact_number
            .map_or(SensitiveValue::Sealed(sealed.contact_number), SensitiveValue::from);
        let email = changes
            .email
            .map_or(SensitiveValue::Sealed(sealed.email), SensitiveValue::from);
        let medical_history = changes
            .medical_history
            .map(SensitiveValue::from)
            .or_else(|| sealed.medical_history.map(SensitiveValue::Sealed));

        Ok(SealedDetails {
            contact_number: self.seal_required(contact_number)?,
            email: self.seal_required(email)?,
            medical_history: self
                .cipher
                .seal(medical_history)
                .map_err(encryption_failed)?,
        })
    }
}

impl<P, A, T> PatientService<P, A, T>
where
    P: PatientRepository,
{
    async fn load(&self, id: PatientId) -> Result<PatientRecord, Error> {
        self.patients
            .find_by_id(id)
            .await
            .map_err(map_patient_repository_error)?
            .ok_or_else(|| patient_not_found(id))
    }
}

#[async_trait]
impl<P, A, T> PatientRecords for PatientService<P, A, T>
where
    P: PatientRepository,
    A: AppointmentRepository,
    T: TreatmentPlanRepository,
{
    async fn list(&self) -> Result<Vec<Patient>, Error> {
        self.patients
            .list()
            .await
            .map_err(map_patient_repository_error)?
            .into_iter()
            .map(|record| self.open(record))
            .collect()
    }

    async fn get(&self, id: PatientId) -> Result<Patient, Error> {
        let record = self.load(id).await?;
        self.open(record)
    }

    async fn create(&self, draft: PatientDraft) -> Result<PatientId, Error> {
        let sealed = self.seal_details(draft.details)?;
        let record = self
            .patients
            .insert(NewPatientRecord {
                profile: draft.profile,
                sealed,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_patient_repository_error)?;
        info!(patient_id = %record.id, "patient created");
        Ok(record.id)
    }

    async fn update(&self, id: PatientId, changes: PatientChanges) -> Result<Patient, Error> {
        let mut record = self.load(id).await?;
        changes.apply_profile(&mut record.profile);
        record.sealed = self.reseal(record.sealed, changes)?;
        record.updated_at = Some(self.clock.utc());

        let replaced = self
            .patients
            .replace(record.clone())
            .await
            .map_err(map_patient_repository_error)?;
        if !replaced {
            return Err(patient_not_found(id));
        }
        self.open(record)
    }

    async fn delete(&self, id: PatientId) -> Result<(), Error> {
        let _exclusive = self.references.exclusive().await;
        self.load(id).await?;
        let appointments = self
            .appointments
            .list_for_patient(id)
            .await
            .map_err(map_appointment_repository_error)?;
        let plans = self
            .plans
            .list_for_patient(id)
            .await
            .map_err(map_treatment_plan_repository_error)?;
        if !appointments.is_empty() || !plans.is_empty() {
            return Err(Error::conflict(
                "Patient has appointments or treatment plans and cannot be deleted",
            ));
        }

        let removed = self
            .patients
            .delete(id)
            .await
            .map_err(map_patient_repository_error)?;
        if !removed {
            return Err(patient_not_found(id));
        }
        info!(patient_id = %id, "patient deleted");
        Ok(())
    }

    async fn search(&self, name: &str) -> Result<PatientOverview, Error> {
        let record = self
            .patients
            .find_first_by_name(name)
            .await
            .map_err(map_patient_repository_error)?
            .ok_or_else(|| Error::not_found("No patient found"))?;
        let appointments = self
            .appointments
            .list_for_patient(record.id)
            .await
            .map_err(map_appointment_repository_error)?;
        let treatment_plans = self
            .plans
            .list_for_patient(record.id)
            .await
            .map_err(map_treatment_plan_repository_error)?;
        Ok(PatientOverview {
            patient: self.open(record)?,
            appointments,
            treatment_plans,
        })
    }
}

#[cfg(test)]
#[path = "patient_service_tests.rs"]
mod tests;
