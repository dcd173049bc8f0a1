//! Service Module
//!
//! Boundary operations the request layer calls into. The service orchestrates
//! registry lookups, guard acquisition and job launches.

pub mod build;

pub use build::BuildService;
