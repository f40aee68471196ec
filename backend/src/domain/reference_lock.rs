//! Coordination between patient deletion and writes that reference a patient.
//!
//! Creating or re-pointing an appointment or treatment plan checks that the
//! patient exists and then writes the row. Deleting a patient checks that no
//! row references it and then removes it. Each pair must run as one step, so
//! referencing writes share the lock and deletion holds it exclusively.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared gate serialising patient deletion against referencing writes.
///
/// Clones share the same underlying lock; every service wired against one
/// store must hold a clone of the same gate.
#[derive(Debug, Clone, Default)]
pub struct PatientReferenceLock(Arc<RwLock<()>>);

impl PatientReferenceLock {
    /// Create an independent gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Held while a write checks for and then references a patient.
    pub async fn referencing(&self) -> RwLockReadGuard<'_, ()> {
        self.0.read().await
    }

    /// Held while a patient is checked for references and removed.
    pub async fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.0.write().await
    }
}
