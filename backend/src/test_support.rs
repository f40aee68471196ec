//! Fixtures shared by unit tests and, through the `test-support` feature,
//! by integration tests under `tests/`.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::access::Role;
use crate::domain::cipher::{CipherKey, FieldCipher};
use crate::domain::ports::UserAdministration;
use crate::domain::{
    AccountDraft, AppointmentService, EmailAddress, Error, InventoryService, Password,
    PasswordLoginService, PatientService, TreatmentPlanService, User, UserService, Username,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryStore;

/// 2023-11-14T22:13:20Z.
const FIXTURE_EPOCH_SECONDS: i64 = 1_700_000_000;

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixtureClock(Mutex<DateTime<Utc>>);

impl Default for FixtureClock {
    fn default() -> Self {
        Self::at(DateTime::from_timestamp(FIXTURE_EPOCH_SECONDS, 0).unwrap_or_default())
    }
}

impl FixtureClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory tables, a fresh cipher, and a fixture clock wired into every
/// driving port.
pub struct InMemoryClinic {
    pub store: MemoryStore,
    pub cipher: Arc<FieldCipher>,
    pub clock: Arc<FixtureClock>,
}

impl Default for InMemoryClinic {
    fn default() -> Self {
        Self::with_key(&CipherKey::generate())
    }
}

impl InMemoryClinic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the clinic around a caller-chosen encryption key.
    pub fn with_key(key: &CipherKey) -> Self {
        Self {
            store: MemoryStore::new(),
            cipher: Arc::new(FieldCipher::new(key)),
            clock: Arc::new(FixtureClock::default()),
        }
    }

    fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    fn users(&self) -> UserService<crate::outbound::memory::MemoryUserRepository> {
        UserService::new(Arc::clone(&self.store.users), self.clock())
    }

    /// Driving ports for the HTTP adapter.
    pub fn http_state(&self) -> HttpState {
        let store = &self.store;
        HttpState {
            login: Arc::new(PasswordLoginService::new(Arc::clone(&store.users))),
            users: Arc::new(self.users()),
            patients: Arc::new(PatientService::new(
                Arc::clone(&store.patients),
                Arc::clone(&store.appointments),
                Arc::clone(&store.treatment_plans),
                Arc::clone(&self.cipher),
                self.clock(),
            )
            .with_reference_lock(store.patient_references.clone())),
            appointments: Arc::new(AppointmentService::new(
                Arc::clone(&store.appointments),
                Arc::clone(&store.patients),
                self.clock(),
            )
            .with_reference_lock(store.patient_references.clone())),
            inventory: Arc::new(InventoryService::new(
                Arc::clone(&store.inventory),
                self.clock(),
            )),
            treatment_plans: Arc::new(TreatmentPlanService::new(
                Arc::clone(&store.treatment_plans),
                Arc::clone(&store.patients),
                self.clock(),
            )
            .with_reference_lock(store.patient_references.clone())),
        }
    }

    /// Register an account directly, bypassing the HTTP guard.
    pub async fn seed_user(&self, username: &str, role: Role, password: &str) -> Result<User, Error> {
        let draft = AccountDraft {
            username: Username::new(username)?,
            email: EmailAddress::new(format!("{username}@clinic.test"))?,
            role,
            password: Password::new(password)?,
        };
        self.users().register(draft).await
    }
}
