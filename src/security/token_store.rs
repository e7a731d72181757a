//! Stage-scoped token store with memory-safe handling and masking
//!
//! Each pipeline stage that needs a credential reads it from its own
//! environment variable; no stage can see another stage's token. Tokens
//! are wrapped in the `secrecy` crate to prevent accidental exposure in
//! logs or memory dumps.

use crate::core::error::{ReleaseError, Stage};
use secrecy::SecretString;
use std::env;

/// Stages that carry credentials, with their environment variable names
const STAGE_TOKENS: &[(Stage, &str)] = &[
    (Stage::RegistryPublish, "CARGO_REGISTRY_TOKEN"),
    (Stage::Announce, "GH_TOKEN"),
];

/// Stage-scoped token store
///
/// # Examples
///
/// ```
/// use release_gate::security::StageTokenStore;
/// use release_gate::Stage;
///
/// let store = StageTokenStore::new();
/// if store.get_token(Stage::RegistryPublish).is_some() {
///     println!("registry token configured");
/// }
/// ```
#[derive(Debug, Default)]
pub struct StageTokenStore;

impl StageTokenStore {
    pub fn new() -> Self {
        Self
    }

    /// Environment variable holding the token for a stage, if the stage
    /// carries a credential at all
    pub fn env_var(stage: Stage) -> Option<&'static str> {
        STAGE_TOKENS
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, var)| *var)
    }

    /// Retrieve the token for a stage from the environment.
    ///
    /// Returns `None` when the stage has no credential configured.
    pub fn get_token(&self, stage: Stage) -> Option<SecretString> {
        let var = Self::env_var(stage)?;
        let value = env::var(var).ok()?;
        Some(SecretString::new(value.into()))
    }

    /// Retrieve the token for a stage, failing with a configuration error
    /// when it is not set
    pub fn require_token(&self, stage: Stage) -> Result<SecretString, ReleaseError> {
        let env_var = Self::env_var(stage).unwrap_or("(none)");
        self.get_token(stage)
            .ok_or(ReleaseError::TokenMissing { stage, env_var })
    }

    /// Masks a token for safe logging.
    ///
    /// Shows only the first 3 and last 3 characters for identification.
    /// Tokens shorter than 10 characters are fully masked as "****".
    pub fn mask_token(&self, token: &str) -> String {
        if token.is_empty() || token.len() < 10 {
            return "****".to_string();
        }

        let prefix = &token[..3];
        let suffix = &token[token.len() - 3..];
        format!("{}...{}", prefix, suffix)
    }
}
