//! In-process repositories backed by ordered maps.
//!
//! Each table sits behind its own `tokio::sync::RwLock` and allocates ids
//! sequentially from 1. Ids are never reused after a delete. Patient rows hold
//! only ciphertext for sensitive attributes, exactly as a database would.

mod appointments;
mod inventory;
mod patients;
mod treatment_plans;
mod users;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::PatientReferenceLock;

pub use appointments::MemoryAppointmentRepository;
pub use inventory::MemoryInventoryRepository;
pub use patients::MemoryPatientRepository;
pub use treatment_plans::MemoryTreatmentPlanRepository;
pub use users::MemoryUserRepository;

/// One shared handle per table, cloned into every service that needs it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub users: Arc<MemoryUserRepository>,
    pub patients: Arc<MemoryPatientRepository>,
    pub appointments: Arc<MemoryAppointmentRepository>,
    pub inventory: Arc<MemoryInventoryRepository>,
    pub treatment_plans: Arc<MemoryTreatmentPlanRepository>,
    /// Gate shared by every service that checks or creates patient references.
    pub patient_references: PatientReferenceLock,
}

impl MemoryStore {
    /// Empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rows keyed by id plus the last id handed out.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    /// Reserve the next id, or `None` once the sequence is exhausted.
    fn allocate(&mut self) -> Option<i64> {
        self.last_id = self.last_id.checked_add(1)?;
        Some(self.last_id)
    }

    fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    fn put(&mut self, id: i64, row: T) {
        self.rows.insert(id, row);
    }

    fn remove(&mut self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }

    /// Rows in ascending id order.
    fn rows(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }
}

const SEQUENCE_EXHAUSTED: &str = "id sequence exhausted";

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ids_are_sequential_and_not_reused() {
        let mut table = Table::<&str>::default();
        let first = table.allocate().expect("id");
        table.put(first, "a");
        assert!(table.remove(first));
        let second = table.allocate().expect("id");
        assert_eq!((first, second), (1, 2));
        assert!(table.get(first).is_none());
    }

    #[rstest]
    fn exhausted_sequence_yields_none() {
        let mut table = Table::<()> {
            rows: BTreeMap::new(),
            last_id: i64::MAX,
        };
        assert_eq!(table.allocate(), None);
    }
}
