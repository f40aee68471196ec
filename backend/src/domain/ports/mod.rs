//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) describe what the domain needs from storage
//! and expose typed errors. Driving ports are the use-cases inbound adapters
//! call; they speak in domain [`Error`](crate::domain::Error) values.

mod macros;
pub(crate) use macros::define_port_error;

mod appointment_book;
mod appointment_repository;
mod inventory_ledger;
mod inventory_repository;
mod login_service;
mod patient_records;
mod patient_repository;
mod treatment_plan_book;
mod treatment_plan_repository;
mod user_administration;
mod user_repository;

pub use appointment_book::AppointmentBook;
#[cfg(test)]
pub use appointment_book::MockAppointmentBook;
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{AppointmentRepository, AppointmentRepositoryError};
pub use inventory_ledger::InventoryLedger;
#[cfg(test)]
pub use inventory_ledger::MockInventoryLedger;
#[cfg(test)]
pub use inventory_repository::MockInventoryRepository;
pub use inventory_repository::{InventoryRepository, InventoryRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use patient_records::MockPatientRecords;
pub use patient_records::PatientRecords;
#[cfg(test)]
pub use patient_repository::MockPatientRepository;
pub use patient_repository::{PatientRepository, PatientRepositoryError};
#[cfg(test)]
pub use treatment_plan_book::MockTreatmentPlanBook;
pub use treatment_plan_book::TreatmentPlanBook;
#[cfg(test)]
pub use treatment_plan_repository::MockTreatmentPlanRepository;
pub use treatment_plan_repository::{TreatmentPlanRepository, TreatmentPlanRepositoryError};
#[cfg(test)]
pub use user_administration::MockUserAdministration;
pub use user_administration::UserAdministration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
