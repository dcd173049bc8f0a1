//! Configuration watcher
//!
//! Keeps the registry in sync with the target document without a restart. A
//! scanner task polls the configured directory and pushes change events onto a
//! single-subscriber channel; the consumer filters them to the configured file
//! name (case-insensitive), lets bursts settle, and reloads.
//!
//! A failed reload is logged and the previous snapshot stays live — the
//! registry is never replaced with a partially-failed load. Activity on other
//! files in the directory never triggers a reload.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::loader;
use crate::registry::BuildRegistry;

/// One observed change in the watched directory.
#[derive(Debug)]
struct ChangeEvent {
    file_name: String,
}

/// Watches the document location and hot-reloads the registry.
pub struct ConfigWatcher {
    config: Config,
    registry: Arc<BuildRegistry>,
}

impl ConfigWatcher {
    pub fn new(config: Config, registry: Arc<BuildRegistry>) -> Self {
        Self { config, registry }
    }

    /// Starts the watcher on its own tasks.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs the scanner and the reload consumer until aborted.
    pub async fn run(self) {
        info!(
            "watching '{}' for changes to '{}' (poll interval {:?})",
            self.config.config_dir.display(),
            self.config.config_filename,
            self.config.poll_interval
        );

        let (tx, rx) = mpsc::channel(16);
        let scanner = Self::spawn_scanner(self.config.clone(), tx);

        self.consume(rx).await;

        // Only reached if the scanner dropped its sender
        scanner.abort();
    }

    /// Spawns the directory scanner.
    ///
    /// The first pass establishes a baseline without emitting events, so the
    /// initial load done at bootstrap is not repeated.
    fn spawn_scanner(
        config: Config,
        tx: mpsc::Sender<ChangeEvent>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = time::interval(config.poll_interval);
            let mut seen: HashMap<PathBuf, Fingerprint> = HashMap::new();
            let mut baseline = true;

            loop {
                interval.tick().await;

                let entries = match scan_dir(&config.config_dir) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(
                            "failed to scan '{}': {e}",
                            config.config_dir.display()
                        );
                        continue;
                    }
                };

                for (path, fingerprint) in entries {
                    let changed = seen.insert(path.clone(), fingerprint) != Some(fingerprint);

                    if changed && !baseline {
                        let Some(file_name) = path.file_name() else {
                            continue;
                        };

                        let event = ChangeEvent {
                            file_name: file_name.to_string_lossy().into_owned(),
                        };

                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                }

                baseline = false;
            }
        })
    }

    /// Consumes change events: filter by file name, debounce, reload.
    async fn consume(&self, mut rx: mpsc::Receiver<ChangeEvent>) {
        while let Some(event) = rx.recv().await {
            if !event
                .file_name
                .eq_ignore_ascii_case(&self.config.config_filename)
            {
                debug!("ignoring change to unrelated file '{}'", event.file_name);
                continue;
            }

            // Let the write burst settle, then fold queued events into one
            // reload of the latest contents
            time::sleep(self.config.debounce).await;
            while rx.try_recv().is_ok() {}

            self.reload();
        }
    }

    fn reload(&self) {
        let path = self.config.document_path();

        match loader::load_document(&path) {
            Ok(targets) => {
                let count = targets.len();
                let generation = self.registry.replace(targets);
                info!("configuration reloaded: generation {generation}, {count} target(s)");
            }
            Err(e) => {
                warn!("configuration reload failed, keeping previous target set: {e}");
            }
        }
    }
}

/// Modification fingerprint of one directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: SystemTime,
    len: u64,
}

fn scan_dir(dir: &std::path::Path) -> std::io::Result<Vec<(PathBuf, Fingerprint)>> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;

        // Directory-only events are of no interest
        if !metadata.is_file() {
            continue;
        }

        entries.push((
            entry.path(),
            Fingerprint {
                modified: metadata.modified()?,
                len: metadata.len(),
            },
        ));
    }

    Ok(entries)
}
