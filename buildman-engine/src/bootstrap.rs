//! Engine bootstrap
//!
//! Wires loader, registry, watcher and service together: validate settings,
//! perform the initial load (a hard failure — the engine refuses to start
//! without a valid document, like any other bad configuration), then start
//! watching for live edits.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::executor::ProcessScriptRunner;
use crate::loader;
use crate::registry::BuildRegistry;
use crate::service::BuildService;
use crate::watcher::ConfigWatcher;

/// A running engine: the service facade plus the watcher behind it.
pub struct BuildManager {
    service: Arc<BuildService>,
    watcher: tokio::task::JoinHandle<()>,
}

impl BuildManager {
    /// The boundary facade for the request layer.
    pub fn service(&self) -> &Arc<BuildService> {
        &self.service
    }

    /// Stops watching for configuration changes. In-flight builds finish on
    /// their own tasks.
    pub fn shutdown(self) {
        self.watcher.abort();
    }
}

/// Starts the engine.
pub async fn start(config: Config) -> Result<BuildManager> {
    config.validate()?;

    let path = config.document_path();
    let targets = loader::load_document(&path)
        .with_context(|| format!("failed to load initial configuration from '{}'", path.display()))?;

    info!(
        "loaded {} build target(s) from '{}'",
        targets.len(),
        path.display()
    );

    let registry = Arc::new(BuildRegistry::new());
    registry.replace(targets);

    let service = Arc::new(BuildService::new(
        Arc::clone(&registry),
        Arc::new(ProcessScriptRunner),
    ));

    let watcher = ConfigWatcher::new(config, registry).spawn();

    Ok(BuildManager { service, watcher })
}
