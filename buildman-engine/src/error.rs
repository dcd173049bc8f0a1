//! Error types for the Buildman engine

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Errors that abort a single load of the target document.
///
/// A load is all-or-nothing: any of these leaves the previously active
/// registry snapshot untouched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document itself could not be read
    #[error("failed to read configuration document '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Syntax error, missing attribute, empty display metadata or duplicate id
    #[error("malformed configuration document: {0}")]
    Malformed(String),

    /// A `File` value source points at a file that does not exist
    #[error(
        "the file containing the source values for parameter '{parameter}' of target '{target}' could not be found: '{}'",
        path.display()
    )]
    MissingValueFile {
        target: String,
        parameter: String,
        path: PathBuf,
    },

    /// The value-source kind tag is neither `List` nor `File`
    #[error("the value source '{kind}' for parameter '{parameter}' of target '{target}' is not valid")]
    InvalidValueSource {
        target: String,
        parameter: String,
        kind: String,
    },
}

/// Errors surfaced synchronously to the caller of a trigger or status query.
///
/// None of these are retried by the engine. A failed or non-zero process exit
/// after a successful launch is not an error at this level; it only ends the
/// running state.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// No target with this id in the current snapshot
    #[error("no build target with id '{0}'")]
    NotFound(Uuid),

    /// A run for this target is already in flight
    #[error("a build for target '{name}' is already running")]
    AlreadyRunning { id: Uuid, name: String },

    /// The target's script does not exist at trigger time
    #[error("the build script for target '{name}' could not be found at '{}'", path.display())]
    ScriptMissing { name: String, path: PathBuf },

    /// The OS refused to launch the script
    #[error("failed to launch build script for target '{name}': {source}")]
    LaunchFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl TriggerError {
    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error is an "already running" rejection
    pub fn is_already_running(&self) -> bool {
        matches!(self, Self::AlreadyRunning { .. })
    }
}
