//! Buildman Engine
//!
//! The build-target registry and single-flight job executor behind Buildman.
//!
//! Architecture:
//! - Configuration: Engine settings from environment or defaults
//! - Loader: Parses the declarative target document, resolves parameter values
//! - Registry: Versioned, atomically swapped snapshots of the target set
//! - Watcher: Polls the document location and hot-reloads the registry
//! - Guard + Executor: Single-flight acquisition and external process supervision
//! - Service: Boundary operations the request layer calls into
//!
//! The engine exposes three operations to the (external) request layer:
//! listing targets, triggering a build, and querying running state. A trigger
//! returns as soon as the script is launched; the process is supervised on its
//! own task and the guard is released when it exits, whatever the exit code.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod executor;
pub mod guard;
pub mod loader;
pub mod registry;
pub mod service;
pub mod watcher;

pub use bootstrap::{BuildManager, start};
pub use config::Config;
pub use error::{ConfigError, TriggerError};
pub use service::BuildService;
