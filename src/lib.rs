pub mod core;
pub mod gate;
pub mod orchestration;
pub mod packaging;
pub mod registry;
pub mod release_host;
pub mod security;
pub mod validation;

pub use crate::core::config::ReleaseConfig;
pub use crate::core::error::{ErrorKind, ReleaseError, Stage};
pub use crate::core::state_machine::{ReleaseState, ReleaseStateMachine};
pub use crate::core::traits::{
    Packager, RegistryClient, RegistryPublishOutcome, ReleaseHost, ReleaseOutcome, ReleaseRecord,
    ReleaseRequest,
};
pub use crate::gate::{PublishDecision, VersionGate};
pub use crate::orchestration::{PublishCoordinator, ReleaseReport, exit_code};
pub use crate::packaging::{Artifact, ArtifactIdentity, CargoPackager};
pub use crate::registry::CratesIoRegistry;
pub use crate::release_host::GithubReleases;
pub use crate::security::{CommandError, SafeCommandExecutor, StageTokenStore};
pub use crate::validation::Manifest;
