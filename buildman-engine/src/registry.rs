//! Build target registry
//!
//! Process-wide, read-mostly store of the current target set. The registry
//! hands out immutable, versioned snapshots; a reload builds a whole new
//! snapshot and swaps it in atomically, so a reader mid-iteration sees the old
//! set or the new set in full, never a mix.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use buildman_core::domain::target::BuildTarget;

/// One immutable generation of the target set.
#[derive(Debug)]
pub struct RegistrySnapshot {
    generation: u64,
    loaded_at: DateTime<Utc>,
    targets: Vec<BuildTarget>,
    index: HashMap<Uuid, usize>,
}

impl RegistrySnapshot {
    fn new(generation: u64, targets: Vec<BuildTarget>) -> Self {
        let index = targets
            .iter()
            .enumerate()
            .map(|(position, target)| (target.id, position))
            .collect();

        Self {
            generation,
            loaded_at: Utc::now(),
            targets,
            index,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }

    pub fn get(&self, id: Uuid) -> Option<&BuildTarget> {
        self.index.get(&id).map(|&position| &self.targets[position])
    }
}

/// Swappable holder of the current snapshot.
///
/// Only the loader/watcher pipeline calls [`BuildRegistry::replace`]; everyone
/// else reads.
#[derive(Debug)]
pub struct BuildRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl BuildRegistry {
    /// Creates a registry with an empty generation-zero snapshot.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(RegistrySnapshot::new(0, Vec::new()))),
        }
    }

    /// Current snapshot. The returned `Arc` stays valid (and unchanged) across
    /// later reloads.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current.read().unwrap().clone()
    }

    /// All targets in the current snapshot.
    pub fn list(&self) -> Vec<BuildTarget> {
        self.snapshot().targets().to_vec()
    }

    /// Looks up one target by id in the current snapshot.
    pub fn get(&self, id: Uuid) -> Option<BuildTarget> {
        self.snapshot().get(id).cloned()
    }

    /// Atomically replaces the active target set, returning the new
    /// generation.
    pub fn replace(&self, targets: Vec<BuildTarget>) -> u64 {
        let mut current = self.current.write().unwrap();
        let generation = current.generation() + 1;
        *current = Arc::new(RegistrySnapshot::new(generation, targets));
        generation
    }
}

impl Default for BuildRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str) -> BuildTarget {
        BuildTarget {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} installer"),
            script_path: "/bin/true".into(),
            parameters: Vec::new(),
            running: false,
        }
    }

    #[test]
    fn test_starts_empty_at_generation_zero() {
        let registry = BuildRegistry::new();
        assert_eq!(registry.snapshot().generation(), 0);
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_replace_bumps_generation() {
        let registry = BuildRegistry::new();

        assert_eq!(registry.replace(vec![target("Nightly")]), 1);
        assert_eq!(registry.replace(vec![target("Nightly")]), 2);
        assert_eq!(registry.snapshot().generation(), 2);
    }

    #[test]
    fn test_get_by_id() {
        let registry = BuildRegistry::new();
        let nightly = target("Nightly");
        let id = nightly.id;
        registry.replace(vec![nightly, target("Release")]);

        assert_eq!(registry.get(id).unwrap().name, "Nightly");
        assert!(registry.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_held_snapshot_is_unaffected_by_replace() {
        let registry = BuildRegistry::new();
        registry.replace(vec![target("Nightly")]);

        let held = registry.snapshot();
        registry.replace(vec![target("Release"), target("Beta")]);

        assert_eq!(held.targets().len(), 1);
        assert_eq!(held.targets()[0].name, "Nightly");
        assert_eq!(registry.snapshot().targets().len(), 2);
    }
}
