//! Single-flight execution guard
//!
//! At most one run may be in flight per target id. Running state is keyed by
//! id, independent of registry snapshots, so a configuration reload never
//! loses the in-flight bit for a target that is mid-run.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// The set of target ids with a run currently in flight.
#[derive(Debug, Default)]
pub struct ExecutionGuard {
    running: Mutex<HashSet<Uuid>>,
}

impl ExecutionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically marks `id` as running.
    ///
    /// Returns `None` if a run is already in flight; otherwise a permit whose
    /// drop releases the id again. The permit must stay alive for the whole
    /// run.
    pub fn try_acquire(self: &Arc<Self>, id: Uuid) -> Option<RunPermit> {
        let mut running = self.running.lock().unwrap();

        if running.insert(id) {
            Some(RunPermit {
                id,
                guard: Arc::clone(self),
            })
        } else {
            None
        }
    }

    pub fn is_running(&self, id: Uuid) -> bool {
        self.running.lock().unwrap().contains(&id)
    }

    fn release(&self, id: Uuid) {
        self.running.lock().unwrap().remove(&id);
        debug!("released execution guard for target {id}");
    }
}

/// Held for exactly as long as one run is in flight.
#[derive(Debug)]
pub struct RunPermit {
    id: Uuid,
    guard: Arc<ExecutionGuard>,
}

impl RunPermit {
    pub fn target_id(&self) -> Uuid {
        self.id
    }
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.guard.release(self.id);
    }
}
