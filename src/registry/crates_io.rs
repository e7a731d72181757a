//! crates.io registry adapter
//!
//! Version lookup goes through the crates.io HTTP API; the publish itself
//! is delegated to `cargo publish` with the registry token injected into
//! that child process only. Remote rejections are classified from the
//! command output into the typed publish outcomes.

use crate::core::error::{ReleaseError, Stage};
use crate::core::traits::{RegistryClient, RegistryPublishOutcome};
use crate::security::command_executor::SafeCommandExecutor;
use crate::security::token_store::StageTokenStore;
use async_trait::async_trait;
use semver::Version;
use serde::Deserialize;
use std::path::Path;

/// Default API base URL
const CRATES_IO_API: &str = "https://crates.io/api/v1";

/// crates.io requires an identifying User-Agent on API requests
const USER_AGENT: &str = concat!("release-gate/", env!("CARGO_PKG_VERSION"));

/// Subset of the crates.io crate response
#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
}

#[derive(Debug, Deserialize)]
struct CrateInfo {
    max_version: String,
}

/// crates.io registry client
pub struct CratesIoRegistry {
    api_base: String,
    http: reqwest::Client,
    executor: SafeCommandExecutor,
    tokens: StageTokenStore,
}

impl CratesIoRegistry {
    pub fn new<P: AsRef<Path>>(checkout: P) -> Result<Self, ReleaseError> {
        let executor =
            SafeCommandExecutor::new(checkout).map_err(|e| ReleaseError::CommandError {
                stage: Stage::RegistryPublish,
                message: e.to_string(),
            })?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ReleaseError::NetworkError {
                stage: Stage::Gate,
                message: e.to_string(),
            })?;

        Ok(Self {
            api_base: CRATES_IO_API.to_string(),
            http,
            executor,
            tokens: StageTokenStore::new(),
        })
    }

    /// Override the API base URL (alternative registry endpoints)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl RegistryClient for CratesIoRegistry {
    fn name(&self) -> &str {
        "crates.io"
    }

    async fn lookup_latest(&self, package: &str) -> Result<Option<Version>, ReleaseError> {
        let url = format!("{}/crates/{}", self.api_base, package);

        let response =
            self.http
                .get(&url)
                .send()
                .await
                .map_err(|e| ReleaseError::NetworkError {
                    stage: Stage::Gate,
                    message: e.to_string(),
                })?;

        // No prior release: the bootstrap case, not an error.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ReleaseError::NetworkError {
                stage: Stage::Gate,
                message: format!("registry returned {}", response.status()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ReleaseError::NetworkError {
                stage: Stage::Gate,
                message: e.to_string(),
            })?;

        let parsed: CrateResponse =
            serde_json::from_str(&body).map_err(|e| ReleaseError::NetworkError {
                stage: Stage::Gate,
                message: format!("unexpected registry response: {}", e),
            })?;

        let version = Version::parse(&parsed.krate.max_version).map_err(|e| {
            ReleaseError::NetworkError {
                stage: Stage::Gate,
                message: format!(
                    "registry reported unparseable version {}: {}",
                    parsed.krate.max_version, e
                ),
            }
        })?;

        Ok(Some(version))
    }

    async fn publish(&self, _checkout: &Path) -> Result<RegistryPublishOutcome, ReleaseError> {
        let token = self.tokens.require_token(Stage::RegistryPublish)?;

        let output = self
            .executor
            .execute(
                "cargo",
                &["publish", "--all-features"],
                &[("CARGO_REGISTRY_TOKEN", &token)],
            )
            .await
            .map_err(|e| ReleaseError::CommandError {
                stage: Stage::RegistryPublish,
                message: e.to_string(),
            })?;

        if output.status.success() {
            return Ok(RegistryPublishOutcome::Ok);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(classify_publish_failure(&stderr))
    }
}

/// Classify `cargo publish` failure output into a typed outcome
fn classify_publish_failure(stderr: &str) -> RegistryPublishOutcome {
    let lower = stderr.to_lowercase();

    if lower.contains("already uploaded") || lower.contains("already exists") {
        return RegistryPublishOutcome::Conflict;
    }

    if lower.contains("401")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
        || lower.contains("invalid token")
    {
        return RegistryPublishOutcome::AuthError {
            message: stderr.trim().to_string(),
        };
    }

    RegistryPublishOutcome::NetworkError {
        message: stderr.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_conflict() {
        let stderr = "error: failed to publish to registry\n\
                      Caused by: crate version `1.2.0` is already uploaded";

        assert_eq!(
            classify_publish_failure(stderr),
            RegistryPublishOutcome::Conflict
        );
    }

    #[test]
    fn test_classify_auth_error() {
        let stderr = "error: failed to publish\nCaused by: the remote server responded \
                      with an error (status 401 Unauthorized)";

        assert!(matches!(
            classify_publish_failure(stderr),
            RegistryPublishOutcome::AuthError { .. }
        ));
    }

    #[test]
    fn test_classify_network_error() {
        let stderr = "error: failed to publish\nCaused by: [6] Could not resolve hostname";

        assert!(matches!(
            classify_publish_failure(stderr),
            RegistryPublishOutcome::NetworkError { .. }
        ));
    }

    #[test]
    fn test_parse_crate_response() {
        let body = r#"{"crate": {"id": "widget", "max_version": "1.9.0", "downloads": 42}}"#;

        let parsed: CrateResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.krate.max_version, "1.9.0");
    }

    #[test]
    fn test_registry_name() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let registry = CratesIoRegistry::new(temp_dir.path()).unwrap();

        assert_eq!(registry.name(), "crates.io");
    }

    #[test]
    fn test_with_api_base_override() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let registry = CratesIoRegistry::new(temp_dir.path())
            .unwrap()
            .with_api_base("http://localhost:8080/api/v1");

        assert_eq!(registry.api_base, "http://localhost:8080/api/v1");
    }
}
