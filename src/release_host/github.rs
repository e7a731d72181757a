//! GitHub release adapter
//!
//! Drives the `gh` CLI to create the tagged release with the packaged
//! artifact attached. Release notes come from the host's own generator;
//! this adapter only supplies tag, title and attachment. The host token is
//! injected into the `gh` child process when configured; otherwise `gh`
//! falls back to its own stored authentication.

use crate::core::error::{ReleaseError, Stage};
use crate::core::traits::{ReleaseHost, ReleaseOutcome, ReleaseRecord, ReleaseRequest};
use crate::security::command_executor::SafeCommandExecutor;
use crate::security::token_store::StageTokenStore;
use async_trait::async_trait;
use std::path::Path;

/// Release host backed by the `gh` CLI
pub struct GithubReleases {
    executor: SafeCommandExecutor,
    tokens: StageTokenStore,
}

impl GithubReleases {
    pub fn new<P: AsRef<Path>>(checkout: P) -> Result<Self, ReleaseError> {
        let executor =
            SafeCommandExecutor::new(checkout).map_err(|e| ReleaseError::CommandError {
                stage: Stage::Announce,
                message: e.to_string(),
            })?;

        Ok(Self {
            executor,
            tokens: StageTokenStore::new(),
        })
    }
}

#[async_trait]
impl ReleaseHost for GithubReleases {
    async fn create_release(
        &self,
        request: &ReleaseRequest,
    ) -> Result<ReleaseOutcome, ReleaseError> {
        let owned_args = build_args(request);
        let args: Vec<&str> = owned_args.iter().map(String::as_str).collect();

        let token = self.tokens.get_token(Stage::Announce);
        let secret_env: Vec<(&str, &secrecy::SecretString)> = match &token {
            Some(token) => vec![("GH_TOKEN", token)],
            None => Vec::new(),
        };

        let output = self
            .executor
            .execute("gh", &args, &secret_env)
            .await
            .map_err(|e| ReleaseError::CommandError {
                stage: Stage::Announce,
                message: e.to_string(),
            })?;

        if output.status.success() {
            // gh prints the release URL on success
            let stdout = String::from_utf8_lossy(&output.stdout);
            let url = stdout.trim();
            return Ok(ReleaseOutcome::Created(ReleaseRecord {
                tag: request.tag.clone(),
                url: (!url.is_empty()).then(|| url.to_string()),
            }));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(classify_release_failure(&stderr, &request.tag))
    }
}

/// Build the `gh release create` argument list from the request
fn build_args(request: &ReleaseRequest) -> Vec<String> {
    let mut args = vec![
        "release".to_string(),
        "create".to_string(),
        request.tag.clone(),
        request.artifact_path.display().to_string(),
        "--title".to_string(),
        request.title.clone(),
    ];

    if request.generate_notes {
        args.push("--generate-notes".to_string());
    }
    if request.mark_latest {
        args.push("--latest".to_string());
    }
    if let Some(repository) = &request.repository {
        args.push("--repo".to_string());
        args.push(repository.clone());
    }

    args
}

/// Classify `gh release create` failure output into a typed outcome
fn classify_release_failure(stderr: &str, tag: &str) -> ReleaseOutcome {
    let lower = stderr.to_lowercase();

    if lower.contains("already exists") {
        return ReleaseOutcome::DuplicateTag {
            tag: tag.to_string(),
        };
    }

    if lower.contains("401")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
        || lower.contains("gh auth login")
        || lower.contains("bad credentials")
    {
        return ReleaseOutcome::AuthError {
            message: stderr.trim().to_string(),
        };
    }

    ReleaseOutcome::NetworkError {
        message: stderr.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request() -> ReleaseRequest {
        ReleaseRequest {
            repository: None,
            tag: "v1.3.2".to_string(),
            title: "widget 1.3.2".to_string(),
            artifact_path: PathBuf::from("target/package/widget-1.3.2.crate"),
            generate_notes: true,
            mark_latest: true,
        }
    }

    #[test]
    fn test_build_args_full() {
        let mut request = request();
        request.repository = Some("acme/widget".to_string());

        let args = build_args(&request);

        assert_eq!(args[0], "release");
        assert_eq!(args[1], "create");
        assert_eq!(args[2], "v1.3.2");
        assert_eq!(args[3], "target/package/widget-1.3.2.crate");
        assert!(args.contains(&"--generate-notes".to_string()));
        assert!(args.contains(&"--latest".to_string()));
        assert!(args.contains(&"--repo".to_string()));
        assert!(args.contains(&"acme/widget".to_string()));
    }

    #[test]
    fn test_build_args_without_repository() {
        let args = build_args(&request());

        assert!(!args.contains(&"--repo".to_string()));
    }

    #[test]
    fn test_build_args_omits_notes_when_disabled() {
        let mut request = request();
        request.generate_notes = false;
        request.mark_latest = false;

        let args = build_args(&request);

        assert!(!args.contains(&"--generate-notes".to_string()));
        assert!(!args.contains(&"--latest".to_string()));
    }

    #[test]
    fn test_classify_duplicate_tag() {
        let outcome =
            classify_release_failure("HTTP 422: Validation Failed: already exists", "v1.0.0");

        assert_eq!(
            outcome,
            ReleaseOutcome::DuplicateTag {
                tag: "v1.0.0".to_string()
            }
        );
    }

    #[test]
    fn test_classify_auth_error() {
        let outcome = classify_release_failure(
            "To get started with GitHub CLI, please run: gh auth login",
            "v1.0.0",
        );

        assert!(matches!(outcome, ReleaseOutcome::AuthError { .. }));
    }

    #[test]
    fn test_classify_network_error() {
        let outcome =
            classify_release_failure("error connecting to api.github.com", "v1.0.0");

        assert!(matches!(outcome, ReleaseOutcome::NetworkError { .. }));
    }
}
