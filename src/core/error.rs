//! Error handling for the release pipeline
//!
//! This module provides the pipeline error taxonomy with recovery guidance
//! using the thiserror crate for ergonomic error handling.
//!
//! A closed version gate is deliberately NOT an error: the coordinator
//! reports it as a `Skipped` terminal state instead.

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pipeline stage at which an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Gate,
    RegistryPublish,
    Package,
    Announce,
}

impl Stage {
    /// Get string representation of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Gate => "gate",
            Stage::RegistryPublish => "registry-publish",
            Stage::Package => "package",
            Stage::Announce => "announce",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a pipeline error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input before any side effect (manifest, config, credentials)
    Configuration,
    /// The registry already has this version
    Conflict,
    /// Network, auth or command failure at some stage
    Transport,
    /// Registry publish succeeded but the release was not created
    Inconsistent,
}

/// Main error type for release pipeline operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    // Configuration errors
    #[error("マニフェストを読み込めませんでした: {path}: {message}")]
    ManifestUnreadable { path: String, message: String },

    #[error("マニフェストにパッケージ名がありません: {path}")]
    MissingPackageName { path: String },

    #[error("マニフェストにバージョンがありません: {path}")]
    MissingVersion { path: String },

    #[error("無効なバージョン番号です: {value}: {message}")]
    InvalidVersion { value: String, message: String },

    #[error("設定ファイルが不正です: {path}: {message}")]
    InvalidConfig { path: String, message: String },

    #[error("[{stage}] 認証トークンが設定されていません: {env_var}")]
    TokenMissing { stage: Stage, env_var: &'static str },

    // Transport errors
    #[error("[{stage}] 認証に失敗しました")]
    AuthenticationFailed { stage: Stage },

    #[error("[{stage}] ネットワークエラーが発生しました: {message}")]
    NetworkError { stage: Stage, message: String },

    #[error("[{stage}] コマンド実行エラー: {message}")]
    CommandError { stage: Stage, message: String },

    #[error("アーティファクトの作成に失敗しました: {message}")]
    PackagingFailed { message: String },

    #[error("リリースタグが既に存在します: {tag}")]
    DuplicateTag { tag: String },

    // Publishing errors
    #[error("同じバージョンが既にレジストリに公開されています: {name} {version}")]
    VersionConflict { name: String, version: Version },

    // State errors
    #[error(
        "レジストリへの公開は成功しましたが、リリースの作成に失敗しました: {version}: {reason}"
    )]
    InconsistentState { version: Version, reason: String },
}

impl ReleaseError {
    /// Get the pipeline stage associated with this error
    pub fn stage(&self) -> Stage {
        match self {
            Self::ManifestUnreadable { .. }
            | Self::MissingPackageName { .. }
            | Self::MissingVersion { .. }
            | Self::InvalidVersion { .. }
            | Self::InvalidConfig { .. } => Stage::Gate,
            Self::TokenMissing { stage, .. }
            | Self::AuthenticationFailed { stage }
            | Self::NetworkError { stage, .. }
            | Self::CommandError { stage, .. } => *stage,
            Self::PackagingFailed { .. } => Stage::Package,
            Self::VersionConflict { .. } => Stage::RegistryPublish,
            Self::DuplicateTag { .. } | Self::InconsistentState { .. } => Stage::Announce,
        }
    }

    /// Classify this error into the pipeline taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ManifestUnreadable { .. }
            | Self::MissingPackageName { .. }
            | Self::MissingVersion { .. }
            | Self::InvalidVersion { .. }
            | Self::InvalidConfig { .. }
            | Self::TokenMissing { .. } => ErrorKind::Configuration,
            Self::AuthenticationFailed { .. }
            | Self::NetworkError { .. }
            | Self::CommandError { .. }
            | Self::PackagingFailed { .. }
            | Self::DuplicateTag { .. } => ErrorKind::Transport,
            Self::VersionConflict { .. } => ErrorKind::Conflict,
            Self::InconsistentState { .. } => ErrorKind::Inconsistent,
        }
    }

    /// Whether the registry publish had already completed when this error
    /// occurred. When true the operator must reconcile manually: the
    /// pipeline never rolls back a registry publish.
    pub fn registry_touched(&self) -> bool {
        matches!(
            self,
            Self::InconsistentState { .. } | Self::DuplicateTag { .. }
        )
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::ManifestUnreadable { .. } => "MANIFEST_UNREADABLE",
            Self::MissingPackageName { .. } => "MISSING_PACKAGE_NAME",
            Self::MissingVersion { .. } => "MISSING_VERSION",
            Self::InvalidVersion { .. } => "INVALID_VERSION",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::TokenMissing { .. } => "TOKEN_MISSING",
            Self::AuthenticationFailed { .. } => "AUTHENTICATION_FAILED",
            Self::NetworkError { .. } => "NETWORK_ERROR",
            Self::CommandError { .. } => "COMMAND_ERROR",
            Self::PackagingFailed { .. } => "PACKAGING_FAILED",
            Self::DuplicateTag { .. } => "DUPLICATE_TAG",
            Self::VersionConflict { .. } => "VERSION_CONFLICT",
            Self::InconsistentState { .. } => "INCONSISTENT_STATE",
        }
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::ManifestUnreadable { .. } => vec![
                "Cargo.tomlが存在するか確認してください",
                "チェックアウトディレクトリを確認してください",
            ],
            Self::MissingPackageName { .. } | Self::MissingVersion { .. } => {
                vec!["Cargo.tomlの[package]セクションを確認してください"]
            }
            Self::InvalidVersion { .. } => {
                vec!["SemVer形式（例: 1.0.0）で指定してください"]
            }
            Self::InvalidConfig { .. } => {
                vec![".release-gate.yamlの構文を確認してください"]
            }
            Self::TokenMissing { .. } => {
                vec!["環境変数を設定してください（例: CARGO_REGISTRY_TOKEN, GH_TOKEN）"]
            }
            Self::AuthenticationFailed { .. } => vec![
                "認証情報を確認してください",
                "環境変数が正しく設定されているか確認してください",
                "トークンの有効期限を確認してください",
            ],
            Self::NetworkError { .. } => vec![
                "インターネット接続を確認してください",
                "しばらく待ってから再試行してください",
            ],
            Self::CommandError { .. } => vec![
                "コマンドの出力を確認してください",
                "必要なツールがインストールされているか確認してください",
            ],
            Self::PackagingFailed { .. } => vec![
                "cargo package --all-features をローカルで実行してください",
                "ビルドエラーを修正してください",
            ],
            Self::DuplicateTag { .. } => {
                vec!["リリースホスト上の既存タグを確認してください"]
            }
            Self::VersionConflict { .. } => vec![
                "Cargo.tomlのバージョン番号を更新してください",
                "前回の実行が部分的に成功していないか確認してください",
            ],
            Self::InconsistentState { .. } => vec![
                "リリースを手動で作成してください（例: gh release create）",
                "レジストリの公開状態はロールバックされません",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_pre_flight() {
        let error = ReleaseError::InvalidVersion {
            value: "not-a-version".to_string(),
            message: "unexpected character".to_string(),
        };

        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert_eq!(error.stage(), Stage::Gate);
        assert!(!error.registry_touched());
        assert_eq!(error.code(), "INVALID_VERSION");
    }

    #[test]
    fn test_version_conflict_is_conflict_kind() {
        let error = ReleaseError::VersionConflict {
            name: "foo".to_string(),
            version: Version::new(1, 2, 0),
        };

        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.stage(), Stage::RegistryPublish);
        assert!(!error.registry_touched());
        let display = error.to_string();
        assert!(display.contains("foo 1.2.0"));
    }

    #[test]
    fn test_network_error_carries_stage() {
        let error = ReleaseError::NetworkError {
            stage: Stage::RegistryPublish,
            message: "connection refused".to_string(),
        };

        assert_eq!(error.kind(), ErrorKind::Transport);
        assert_eq!(error.stage(), Stage::RegistryPublish);
        assert!(error.to_string().contains("connection refused"));
        assert!(error.to_string().contains("registry-publish"));
    }

    #[test]
    fn test_inconsistent_state_is_distinct_from_transport() {
        let transport = ReleaseError::NetworkError {
            stage: Stage::RegistryPublish,
            message: "timeout".to_string(),
        };
        let inconsistent = ReleaseError::InconsistentState {
            version: Version::new(2, 0, 0),
            reason: transport.to_string(),
        };

        assert_eq!(inconsistent.kind(), ErrorKind::Inconsistent);
        assert_ne!(inconsistent.kind(), transport.kind());
        assert_ne!(inconsistent.code(), transport.code());
        assert_ne!(inconsistent.to_string(), transport.to_string());
        assert!(inconsistent.registry_touched());
        assert!(!transport.registry_touched());
    }

    #[test]
    fn test_token_missing_error() {
        let error = ReleaseError::TokenMissing {
            stage: Stage::RegistryPublish,
            env_var: "CARGO_REGISTRY_TOKEN",
        };

        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert_eq!(error.code(), "TOKEN_MISSING");
        assert!(error.to_string().contains("CARGO_REGISTRY_TOKEN"));
        let actions = error.suggested_actions();
        assert!(actions.iter().any(|&a| a.contains("環境変数")));
    }

    #[test]
    fn test_duplicate_tag_implies_registry_touched() {
        let error = ReleaseError::DuplicateTag {
            tag: "v1.0.0".to_string(),
        };

        assert_eq!(error.stage(), Stage::Announce);
        assert!(error.registry_touched());
    }

    #[test]
    fn test_suggested_actions_present_for_every_error() {
        let errors = vec![
            ReleaseError::ManifestUnreadable {
                path: "Cargo.toml".to_string(),
                message: "no such file".to_string(),
            },
            ReleaseError::AuthenticationFailed {
                stage: Stage::Announce,
            },
            ReleaseError::PackagingFailed {
                message: "build failed".to_string(),
            },
            ReleaseError::InconsistentState {
                version: Version::new(1, 0, 0),
                reason: "duplicate tag".to_string(),
            },
        ];

        for error in errors {
            assert!(!error.suggested_actions().is_empty());
        }
    }

    #[test]
    fn test_error_display_japanese() {
        let error = ReleaseError::VersionConflict {
            name: "release-gate".to_string(),
            version: Version::new(0, 1, 0),
        };

        let display = format!("{}", error);
        assert!(display.contains("既にレジストリに公開"));
    }
}
