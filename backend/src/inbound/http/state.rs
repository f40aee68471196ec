//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable with mocks or in-memory wiring.

use std::sync::Arc;

use crate::domain::ports::{
    AppointmentBook, InventoryLedger, LoginService, PatientRecords, TreatmentPlanBook,
    UserAdministration,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserAdministration>,
    pub patients: Arc<dyn PatientRecords>,
    pub appointments: Arc<dyn AppointmentBook>,
    pub inventory: Arc<dyn InventoryLedger>,
    pub treatment_plans: Arc<dyn TreatmentPlanBook>,
}
