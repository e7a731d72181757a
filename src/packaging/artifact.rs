//! Artifact identity - the naming contract between packaging and announce
//!
//! The identity is derived from the manifest alone, so any component can
//! re-derive the same file name independently. The packager and the
//! announcer must agree on this contract or the run fails.

use crate::validation::manifest::Manifest;
use semver::Version;
use std::fmt;
use std::path::{Path, PathBuf};

/// Fixed suffix required by the registry packaging convention
pub const ARTIFACT_EXTENSION: &str = "crate";

/// Directory under the checkout where the packaged artifact lands
const PACKAGE_OUTPUT_DIR: &str = "target/package";

/// Deterministic artifact identity: `{name}-{version}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactIdentity {
    pub name: String,
    pub version: Version,
}

impl ArtifactIdentity {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
        }
    }

    /// Identity string without the extension
    pub fn base_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Full artifact file name, e.g. `widget-1.3.2.crate`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.base_name(), ARTIFACT_EXTENSION)
    }

    /// Where the packaging step leaves the artifact within the checkout
    pub fn expected_path(&self, checkout: &Path) -> PathBuf {
        checkout.join(PACKAGE_OUTPUT_DIR).join(self.file_name())
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_name())
    }
}

/// Immutable packaged unit. Created once by the packager, consumed exactly
/// once by the release announcer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub identity: ArtifactIdentity,
    pub path: PathBuf,
}
