//! Job executor
//!
//! Launches the external script for an accepted trigger and supervises it to
//! exit. The launch itself is synchronous with respect to the trigger call so
//! that spawn failures reach the caller; waiting happens on a dedicated task
//! that owns the process handle for its whole lifetime.
//!
//! The run permit travels with that task: whatever way the run ends (clean
//! exit, non-zero exit, wait error), dropping the permit releases the target.
//! Exit codes are logged, never surfaced as errors.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use buildman_core::domain::target::BuildTarget;

use crate::error::TriggerError;
use crate::guard::RunPermit;

/// A launched script, waiting to exit.
#[async_trait]
pub trait RunningJob: Send {
    /// Blocks until the process exits; returns its exit code, or `None` if it
    /// was terminated by a signal.
    async fn wait(self: Box<Self>) -> std::io::Result<Option<i32>>;
}

/// Seam for launching a target's script.
///
/// The production implementation spawns a real process; tests substitute a
/// runner whose jobs complete on demand.
pub trait ScriptRunner: Send + Sync {
    fn launch(&self, script: &Path) -> std::io::Result<Box<dyn RunningJob>>;
}

/// Standard runner backed by `tokio::process`.
pub struct ProcessScriptRunner;

impl ScriptRunner for ProcessScriptRunner {
    fn launch(&self, script: &Path) -> std::io::Result<Box<dyn RunningJob>> {
        let child = tokio::process::Command::new(script).spawn()?;
        Ok(Box::new(ProcessJob { child }))
    }
}

struct ProcessJob {
    child: tokio::process::Child,
}

#[async_trait]
impl RunningJob for ProcessJob {
    async fn wait(mut self: Box<Self>) -> std::io::Result<Option<i32>> {
        let status = self.child.wait().await?;
        Ok(status.code())
    }
}

/// Launch + supervision around a [`ScriptRunner`].
pub struct JobExecutor {
    runner: Arc<dyn ScriptRunner>,
}

impl JobExecutor {
    pub fn new(runner: Arc<dyn ScriptRunner>) -> Self {
        Self { runner }
    }

    /// Validates and launches the target's script, then hands the permit to a
    /// supervising task.
    ///
    /// Consumes the permit on every path: failures here release the target
    /// immediately (it never counts as running from the caller's perspective),
    /// success ties the release to process exit.
    pub fn launch(&self, target: &BuildTarget, permit: RunPermit) -> Result<Uuid, TriggerError> {
        if !target.script_path.exists() {
            // `permit` drops here, releasing the guard
            return Err(TriggerError::ScriptMissing {
                name: target.name.clone(),
                path: target.script_path.clone(),
            });
        }

        let job = self
            .runner
            .launch(&target.script_path)
            .map_err(|source| TriggerError::LaunchFailed {
                name: target.name.clone(),
                source,
            })?;

        let job_id = Uuid::new_v4();
        let name = target.name.clone();
        let target_id = permit.target_id();

        tokio::spawn(async move {
            // Owns the permit until the run is over, on every exit path
            let _permit = permit;

            tracing::debug!("supervising build '{name}' (target {target_id}, job {job_id})");

            match job.wait().await {
                Ok(Some(0)) => info!("build '{name}' (job {job_id}) finished successfully"),
                Ok(Some(code)) => warn!("build '{name}' (job {job_id}) exited with code {code}"),
                Ok(None) => warn!("build '{name}' (job {job_id}) was terminated by a signal"),
                Err(e) => error!("failed waiting for build '{name}' (job {job_id}): {e}"),
            }
        });

        Ok(job_id)
    }
}
