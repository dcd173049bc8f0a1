//! Buildman Core
//!
//! Core types for the Buildman build-trigger system.
//!
//! This crate contains:
//! - Domain types: Core business entities (BuildTarget, BuildParameter)
//! - DTOs: Data transfer objects for the request layer

pub mod domain;
pub mod dto;
