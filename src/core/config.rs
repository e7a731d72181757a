//! Configuration for the release pipeline
//!
//! An optional `.release-gate.yaml` in the checkout root overrides the
//! defaults. Values may reference environment variables with `${VAR}`
//! syntax, which is expanded before parsing. An absent file is not an
//! error: the pipeline runs fully unconfigured.

use crate::core::error::ReleaseError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tokio::fs;

/// Configuration file name
const CONFIG_FILENAME: &str = ".release-gate.yaml";

/// Environment variable pattern (${VAR_NAME})
const ENV_VAR_PATTERN: &str = r"\$\{([A-Z_][A-Z0-9_]*)\}";

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReleaseConfig {
    /// Release-host repository (owner/name). When absent the host CLI
    /// infers it from the checkout's git remote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Prefix for release tags (default: "v")
    #[serde(skip_serializing_if = "Option::is_none", rename = "tagPrefix")]
    pub tag_prefix: Option<String>,

    /// Manifest path relative to the checkout (default: "Cargo.toml")
    #[serde(skip_serializing_if = "Option::is_none", rename = "manifestPath")]
    pub manifest_path: Option<String>,

    /// Registry API base URL (default: crates.io)
    #[serde(skip_serializing_if = "Option::is_none", rename = "registryApi")]
    pub registry_api: Option<String>,
}

impl ReleaseConfig {
    /// Load configuration from the checkout, falling back to defaults when
    /// no configuration file exists
    pub async fn load(project_path: &Path) -> Result<Self, ReleaseError> {
        let config_path = project_path.join(CONFIG_FILENAME);

        let content = match fs::read_to_string(&config_path).await {
            Ok(content) => content,
            Err(_) => return Ok(Self::default()),
        };

        let expanded = expand_env_vars(&content);

        serde_yaml::from_str(&expanded).map_err(|e| ReleaseError::InvalidConfig {
            path: config_path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Tag prefix, defaulting to "v"
    pub fn tag_prefix(&self) -> &str {
        self.tag_prefix.as_deref().unwrap_or("v")
    }

    /// Manifest path relative to the checkout, defaulting to "Cargo.toml"
    pub fn manifest_path(&self) -> &str {
        self.manifest_path.as_deref().unwrap_or("Cargo.toml")
    }
}

/// Expand `${VAR}` references from the process environment. Unset
/// variables are left untouched so the YAML error points at them.
fn expand_env_vars(content: &str) -> String {
    let pattern = Regex::new(ENV_VAR_PATTERN).expect("valid env var pattern");

    pattern
        .replace_all(content, |caps: &regex::Captures| {
            env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
