//! Internal helpers shared by the clinic services.

use crate::domain::Error;
use crate::domain::ports::{
    AppointmentRepositoryError, InventoryRepositoryError, PatientRepositoryError,
    TreatmentPlanRepositoryError, UserRepositoryError,
};

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateUsername { .. } => {
            Error::conflict("Username already exists")
        }
    }
}

pub(crate) fn map_patient_repository_error(error: PatientRepositoryError) -> Error {
    match error {
        PatientRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("patient repository unavailable: {message}"))
        }
        PatientRepositoryError::Query { message } => {
            Error::internal(format!("patient repository error: {message}"))
        }
    }
}

pub(crate) fn map_appointment_repository_error(error: AppointmentRepositoryError) -> Error {
    match error {
        AppointmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("appointment repository unavailable: {message}"))
        }
        AppointmentRepositoryError::Query { message } => {
            Error::internal(format!("appointment repository error: {message}"))
        }
    }
}

pub(crate) fn map_inventory_repository_error(error: InventoryRepositoryError) -> Error {
    match error {
        InventoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("inventory repository unavailable: {message}"))
        }
        InventoryRepositoryError::Query { message } => {
            Error::internal(format!("inventory repository error: {message}"))
        }
    }
}

pub(crate) fn map_treatment_plan_repository_error(error: TreatmentPlanRepositoryError) -> Error {
    match error {
        TreatmentPlanRepositoryError::Connection { message } => Error::service_unavailable(
            format!("treatment plan repository unavailable: {message}"),
        ),
        TreatmentPlanRepositoryError::Query { message } => {
            Error::internal(format!("treatment plan repository error: {message}"))
        }
    }
}

pub(crate) fn patient_not_found(id: impl std::fmt::Display) -> Error {
    Error::not_found(format!("patient {id} not found"))
}
