//! Artifact packaging
//!
//! Derives the deterministic artifact identity from the manifest and
//! builds the distributable unit the release announcer attaches.

pub mod artifact;
pub mod packager;

pub use artifact::{ARTIFACT_EXTENSION, Artifact, ArtifactIdentity};
pub use packager::CargoPackager;
