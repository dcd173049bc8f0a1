//! Core domain types
//!
//! This module contains the core domain structures used across the Buildman
//! engine. These types represent the fundamental business entities and are
//! shared between the loader (which produces them), the registry (which holds
//! them), and the executor (which runs them).

pub mod target;
