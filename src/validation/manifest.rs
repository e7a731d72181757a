//! Manifest loading - the read-only source of truth for name and version
//!
//! The manifest is read exactly once per run and never mutated. A version
//! that does not parse as semver is a fatal configuration error raised
//! before any side effect.

use crate::core::error::ReleaseError;
use semver::Version;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// Parsed `Cargo.toml` shape, limited to the fields the pipeline needs
#[derive(Debug, Deserialize)]
struct CargoToml {
    package: Option<PackageSection>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    name: Option<String>,
    version: Option<String>,
}

/// Package identity read from the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub version: Version,
}

impl Manifest {
    /// Load and parse the manifest at `path`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use release_gate::validation::Manifest;
    /// use std::path::Path;
    ///
    /// # async fn example() -> Result<(), release_gate::ReleaseError> {
    /// let manifest = Manifest::load(Path::new("Cargo.toml")).await?;
    /// println!("{} {}", manifest.name, manifest.version);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load(path: &Path) -> Result<Self, ReleaseError> {
        let content =
            fs::read_to_string(path)
                .await
                .map_err(|e| ReleaseError::ManifestUnreadable {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;

        Self::parse(&content, path)
    }

    /// Parse manifest content. Split from `load` so malformed input can be
    /// exercised without touching the filesystem.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ReleaseError> {
        let display_path = path.display().to_string();

        let parsed: CargoToml =
            toml::from_str(content).map_err(|e| ReleaseError::ManifestUnreadable {
                path: display_path.clone(),
                message: e.to_string(),
            })?;

        let package = parsed
            .package
            .ok_or_else(|| ReleaseError::ManifestUnreadable {
                path: display_path.clone(),
                message: "missing [package] section".to_string(),
            })?;

        let name = package
            .name
            .ok_or_else(|| ReleaseError::MissingPackageName {
                path: display_path.clone(),
            })?;

        let version_str = package.version.ok_or_else(|| ReleaseError::MissingVersion {
            path: display_path.clone(),
        })?;

        let version =
            Version::parse(&version_str).map_err(|e| ReleaseError::InvalidVersion {
                value: version_str.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { name, version })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<Manifest, ReleaseError> {
        Manifest::parse(content, Path::new("Cargo.toml"))
    }

    #[test]
    fn test_parse_valid_manifest() {
        let manifest = parse("[package]\nname = \"widget\"\nversion = \"1.3.2\"\n").unwrap();

        assert_eq!(manifest.name, "widget");
        assert_eq!(manifest.version, Version::new(1, 3, 2));
    }

    #[test]
    fn test_parse_missing_name() {
        let result = parse("[package]\nversion = \"1.0.0\"\n");

        assert!(matches!(
            result,
            Err(ReleaseError::MissingPackageName { .. })
        ));
    }

    #[test]
    fn test_parse_missing_version() {
        let result = parse("[package]\nname = \"widget\"\n");

        assert!(matches!(result, Err(ReleaseError::MissingVersion { .. })));
    }

    #[test]
    fn test_parse_invalid_version_is_configuration_error() {
        let result = parse("[package]\nname = \"widget\"\nversion = \"one.two\"\n");

        match result {
            Err(error) => {
                assert!(matches!(error, ReleaseError::InvalidVersion { .. }));
                assert_eq!(error.kind(), ErrorKind::Configuration);
            }
            Ok(_) => panic!("malformed version must not parse"),
        }
    }

    #[test]
    fn test_parse_missing_package_section() {
        let result = parse("[dependencies]\nserde = \"1\"\n");

        assert!(matches!(
            result,
            Err(ReleaseError::ManifestUnreadable { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let manifest_path = temp_dir.path().join("Cargo.toml");
        tokio::fs::write(
            &manifest_path,
            "[package]\nname = \"widget\"\nversion = \"0.4.0\"\n",
        )
        .await
        .unwrap();

        let manifest = Manifest::load(&manifest_path).await.unwrap();

        assert_eq!(manifest.name, "widget");
        assert_eq!(manifest.version, Version::new(0, 4, 0));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = Manifest::load(&temp_dir.path().join("Cargo.toml")).await;

        assert!(matches!(
            result,
            Err(ReleaseError::ManifestUnreadable { .. })
        ));
    }
}
