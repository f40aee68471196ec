//! Wiring of driving ports onto the in-memory store.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use clinic::domain::ports::UserAdministration;
use clinic::domain::{
    AccountDraft, AppointmentService, Error, ErrorCode, InventoryService, PasswordLoginService,
    PatientService, TreatmentPlanService, UserService,
};
use clinic::inbound::http::state::HttpState;
use clinic::outbound::memory::MemoryStore;

use super::ServerConfig;

/// Build every driving port the HTTP adapter needs.
pub fn build_http_state(config: &ServerConfig, store: &MemoryStore) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    HttpState {
        login: Arc::new(PasswordLoginService::new(Arc::clone(&store.users))),
        users: Arc::new(UserService::new(Arc::clone(&store.users), Arc::clone(&clock))),
        patients: Arc::new(PatientService::new(
            Arc::clone(&store.patients),
            Arc::clone(&store.appointments),
            Arc::clone(&store.treatment_plans),
            Arc::clone(&config.cipher),
            Arc::clone(&clock),
        )
        .with_reference_lock(store.patient_references.clone())),
        appointments: Arc::new(AppointmentService::new(
            Arc::clone(&store.appointments),
            Arc::clone(&store.patients),
            Arc::clone(&clock),
        )
        .with_reference_lock(store.patient_references.clone())),
        inventory: Arc::new(InventoryService::new(
            Arc::clone(&store.inventory),
            Arc::clone(&clock),
        )),
        treatment_plans: Arc::new(TreatmentPlanService::new(
            Arc::clone(&store.treatment_plans),
            Arc::clone(&store.patients),
            clock,
        )
        .with_reference_lock(store.patient_references.clone())),
    }
}

/// Create the configured administrator unless the username already exists.
pub async fn seed_bootstrap_admin(state: &HttpState, draft: AccountDraft) -> Result<(), Error> {
    let username = draft.username.as_ref().to_owned();
    match state.users.register(draft).await {
        Ok(user) => {
            info!(user_id = user.id.get(), %username, "bootstrap administrator created");
            Ok(())
        }
        Err(err) if err.code() == ErrorCode::Conflict => {
            info!(%username, "bootstrap administrator already present");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
