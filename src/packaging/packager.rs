//! Cargo-based artifact packaging
//!
//! Runs `cargo package --all-features` so that conditionally-compiled
//! feature code is included in the packaging verification, then checks the
//! artifact landed where the naming contract says it must.

use crate::core::error::{ReleaseError, Stage};
use crate::core::traits::Packager;
use crate::packaging::artifact::{Artifact, ArtifactIdentity};
use crate::security::command_executor::SafeCommandExecutor;
use crate::validation::manifest::Manifest;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

/// Packager backed by the `cargo package` command
pub struct CargoPackager {
    executor: SafeCommandExecutor,
}

impl CargoPackager {
    pub fn new<P: AsRef<Path>>(checkout: P) -> Result<Self, ReleaseError> {
        let executor =
            SafeCommandExecutor::new(checkout).map_err(|e| ReleaseError::CommandError {
                stage: Stage::Package,
                message: e.to_string(),
            })?;

        Ok(Self { executor })
    }
}

#[async_trait]
impl Packager for CargoPackager {
    async fn package(
        &self,
        checkout: &Path,
        manifest: &Manifest,
    ) -> Result<Artifact, ReleaseError> {
        let identity = ArtifactIdentity::from_manifest(manifest);

        let output = self
            .executor
            .execute("cargo", &["package", "--all-features"], &[])
            .await
            .map_err(|e| ReleaseError::CommandError {
                stage: Stage::Package,
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::PackagingFailed {
                message: tail(&stderr),
            });
        }

        let path = identity.expected_path(checkout);
        if fs::metadata(&path).await.is_err() {
            return Err(ReleaseError::PackagingFailed {
                message: format!("artifact not found at {}", path.display()),
            });
        }

        Ok(Artifact { identity, path })
    }
}

/// Last few lines of command output, enough for the operator log
fn tail(output: &str) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let start = lines.len().saturating_sub(5);
    lines[start..].join("\n")
}
