//! Build target domain types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// A named, independently triggerable build/installer definition.
///
/// Structure shared between the loader (produces), registry (holds) and
/// executor (runs). One `BuildTarget` lives exactly as long as the registry
/// snapshot that holds it; a reload produces a fresh set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildTarget {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub script_path: PathBuf,
    pub parameters: Vec<BuildParameter>,

    /// Whether a run is currently in flight for this target.
    ///
    /// Never read from the configuration document. The execution guard is the
    /// single writer; reads through the service facade are stamped from live
    /// guard state.
    #[serde(skip_deserializing)]
    pub running: bool,
}

/// A single build parameter with its allowed values.
///
/// Values are resolved once, at load time, from the parameter's source.
/// Parameters are string-valued only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildParameter {
    pub name: String,
    pub description: String,
    pub source: ValueSource,
    pub source_values: Vec<String>,
}

/// Origin of a parameter's allowed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSource {
    /// Inline comma-delimited list in the document.
    List,
    /// External file, one value per line.
    File,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::List => write!(f, "List"),
            ValueSource::File => write!(f, "File"),
        }
    }
}
