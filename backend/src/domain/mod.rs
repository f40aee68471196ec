//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed clinic records, the field cipher that seals
//! patient contact and medical data, and the access rules that gate every
//! use-case. Nothing here depends on HTTP or storage; adapters reach the
//! domain through [`ports`].
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport agnostic failure payload.
//! - [`cipher::FieldCipher`]: authenticated encryption of single fields.
//! - [`access::AccessPolicy`]: ordered authentication and role checks.
//! - `*Service` types: driving port implementations over driven ports.

pub mod access;
pub mod appointment;
pub mod auth;
pub mod cipher;
pub mod error;
pub mod fingerprint;
pub mod ids;
pub mod inventory;
pub mod password;
pub mod patient;
pub mod ports;
pub mod reference_lock;
pub mod trace_id;
pub mod treatment_plan;
pub mod user;
pub mod validation;

mod appointment_service;
mod inventory_service;
mod login_service;
mod patient_service;
mod service_support;
mod treatment_plan_service;
mod user_service;

pub use self::appointment::{Appointment, AppointmentChanges, AppointmentDraft};
pub use self::appointment_service::AppointmentService;
pub use self::auth::LoginCredentials;
pub use self::error::{Error, ErrorCode};
pub use self::fingerprint::material_fingerprint;
pub use self::ids::{
    AppointmentId, InventoryItemId, PatientId, RecordIdError, TreatmentPlanId, UserId,
};
pub use self::inventory::{InventoryChanges, InventoryItem, InventoryItemDraft};
pub use self::inventory_service::InventoryService;
pub use self::login_service::PasswordLoginService;
pub use self::password::{Password, PasswordHash, PasswordHashError};
pub use self::patient::{
    NewPatientRecord, Patient, PatientChanges, PatientDraft, PatientOverview, PatientProfile,
    PatientRecord, SealedDetails, SensitiveDetails,
};
pub use self::patient_service::PatientService;
pub use self::reference_lock::PatientReferenceLock;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::treatment_plan::{
    TreatmentPlan, TreatmentPlanChanges, TreatmentPlanDraft, TreatmentStatus,
};
pub use self::treatment_plan_service::TreatmentPlanService;
pub use self::user::{
    AccountChanges, AccountDraft, EmailAddress, NewUser, User, UserChanges, Username,
};
pub use self::user_service::UserService;
pub use self::validation::{ValidationError, ValidationReason};
