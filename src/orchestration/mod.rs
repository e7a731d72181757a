//! Orchestration layer for the release pipeline
//!
//! This module provides the coordinator that sequences the version gate,
//! the registry publish, artifact packaging and the release announcement.

pub mod coordinator;

pub use coordinator::{PublishCoordinator, ReleaseReport, exit_code};
