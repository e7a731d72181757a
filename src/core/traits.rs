//! Core traits and types for the release pipeline
//!
//! This module defines the seams between the coordinator and its external
//! collaborators: the package registry, the release host, and the artifact
//! packager. The coordinator only ever talks to these traits, which keeps
//! the ordering and failure-containment logic testable against fakes.

use crate::core::error::ReleaseError;
use crate::packaging::artifact::Artifact;
use crate::validation::manifest::Manifest;
use async_trait::async_trait;
use semver::Version;
use std::path::{Path, PathBuf};

/// Outcome of the irreversible registry upload.
///
/// Remote rejections are data, not `Err`: the coordinator decides how each
/// one maps into the error taxonomy. `Err` is reserved for failures to run
/// the operation at all (missing token, command could not be spawned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryPublishOutcome {
    Ok,
    Conflict,
    AuthError { message: String },
    NetworkError { message: String },
}

/// Outcome of release creation on the source-control host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Created(ReleaseRecord),
    DuplicateTag { tag: String },
    AuthError { message: String },
    NetworkError { message: String },
}

/// Remote release entry, keyed by its version tag.
///
/// Created exactly once per release; the pipeline never updates or deletes
/// an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub tag: String,
    pub url: Option<String>,
}

/// Everything the release host needs to create one release entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Repository identity (owner/name); None lets the host infer it from
    /// the checkout
    pub repository: Option<String>,
    pub tag: String,
    pub title: String,
    pub artifact_path: PathBuf,
    pub generate_notes: bool,
    pub mark_latest: bool,
}

/// Read and write access to the package registry
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Registry name for operator-facing output (e.g. "crates.io")
    fn name(&self) -> &str;

    /// Currently published version of the package, or `None` when the
    /// package has never been published (the bootstrap case).
    ///
    /// Read once before publishing; never re-read mid-run.
    async fn lookup_latest(&self, package: &str) -> Result<Option<Version>, ReleaseError>;

    /// Upload the package from the checkout. Irreversible once the registry
    /// accepts it; the pipeline takes no compensating action afterwards.
    async fn publish(&self, checkout: &Path) -> Result<RegistryPublishOutcome, ReleaseError>;
}

/// Release creation on the source-control host
#[async_trait]
pub trait ReleaseHost: Send + Sync {
    async fn create_release(
        &self,
        request: &ReleaseRequest,
    ) -> Result<ReleaseOutcome, ReleaseError>;
}

/// Builds the distributable artifact from the checkout
#[async_trait]
pub trait Packager: Send + Sync {
    /// Produce exactly one artifact whose identity is derived from the
    /// manifest. The returned path must match the deterministic naming
    /// contract of `ArtifactIdentity`.
    async fn package(&self, checkout: &Path, manifest: &Manifest)
    -> Result<Artifact, ReleaseError>;
}
