//! Build service
//!
//! The three operations exposed at the engine boundary: list targets, trigger
//! a build, query running state. A trigger returns as soon as the script is
//! launched; it never waits for the process to finish.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use buildman_core::domain::target::BuildTarget;
use buildman_core::dto::TriggerReceipt;

use crate::error::TriggerError;
use crate::executor::{JobExecutor, ScriptRunner};
use crate::guard::ExecutionGuard;
use crate::registry::BuildRegistry;

/// Facade over registry, guard and executor.
pub struct BuildService {
    registry: Arc<BuildRegistry>,
    guard: Arc<ExecutionGuard>,
    executor: JobExecutor,
}

impl BuildService {
    pub fn new(registry: Arc<BuildRegistry>, runner: Arc<dyn ScriptRunner>) -> Self {
        Self {
            registry,
            guard: Arc::new(ExecutionGuard::new()),
            executor: JobExecutor::new(runner),
        }
    }

    /// All targets in the current snapshot, with `running` stamped from live
    /// guard state.
    pub fn list_targets(&self) -> Vec<BuildTarget> {
        let snapshot = self.registry.snapshot();

        snapshot
            .targets()
            .iter()
            .map(|target| self.stamp(target.clone()))
            .collect()
    }

    /// One target by id, with `running` stamped from live guard state.
    pub fn get_target(&self, id: Uuid) -> Option<BuildTarget> {
        self.registry.get(id).map(|target| self.stamp(target))
    }

    /// Triggers a build for `id`.
    ///
    /// Exactly one of two concurrent triggers for the same id can succeed; the
    /// other is rejected with [`TriggerError::AlreadyRunning`]. Unknown ids
    /// are rejected distinctly with [`TriggerError::NotFound`].
    pub fn trigger_build(&self, id: Uuid) -> Result<TriggerReceipt, TriggerError> {
        let target = self.registry.get(id).ok_or(TriggerError::NotFound(id))?;

        let permit = self
            .guard
            .try_acquire(id)
            .ok_or_else(|| TriggerError::AlreadyRunning {
                id,
                name: target.name.clone(),
            })?;

        let job_id = self.executor.launch(&target, permit)?;

        info!("accepted build trigger for '{}' (job {job_id})", target.name);

        Ok(TriggerReceipt {
            target_id: id,
            job_id,
            accepted_at: Utc::now(),
        })
    }

    /// Whether a run is in flight for `id`.
    pub fn is_running(&self, id: Uuid) -> Result<bool, TriggerError> {
        if self.registry.snapshot().get(id).is_none() {
            return Err(TriggerError::NotFound(id));
        }

        Ok(self.guard.is_running(id))
    }

    fn stamp(&self, mut target: BuildTarget) -> BuildTarget {
        target.running = self.guard.is_running(target.id);
        target
    }
}
