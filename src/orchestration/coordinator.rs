//! Publish coordinator - sequences gate, publish, package and announce
//!
//! Owns the stop-on-failure policy:
//! - the registry is never touched unless the version gate opens;
//! - the release host is never touched unless the registry publish
//!   succeeded;
//! - once the registry publish succeeded, any later failure is surfaced as
//!   an inconsistent state, and nothing is rolled back.
//!
//! A closed gate ends the run in the `Skipped` terminal state, which is a
//! success, not a failure.

use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseError, Stage};
use crate::core::state_machine::{ReleaseState, ReleaseStateMachine};
use crate::core::traits::{
    Packager, RegistryClient, RegistryPublishOutcome, ReleaseHost, ReleaseOutcome, ReleaseRecord,
    ReleaseRequest,
};
use crate::gate::version_gate::{PublishDecision, VersionGate};
use crate::validation::manifest::Manifest;
use chrono::{DateTime, Utc};
use semver::Version;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Report returned after a completed (non-failed) run
#[derive(Debug, Clone)]
pub struct ReleaseReport {
    pub package: String,
    pub version: Version,
    /// Registry version observed at gate time, None in the bootstrap case
    pub registry_version: Option<Version>,
    /// Terminal state: `Done` or `Skipped`
    pub state: ReleaseState,
    pub release: Option<ReleaseRecord>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ReleaseReport {
    /// Whether the run ended with the gate closed (no side effects)
    pub fn skipped(&self) -> bool {
        self.state == ReleaseState::Skipped
    }
}

/// Process exit contract: `Done` and `Skipped` both exit 0, any failure
/// exits non-zero
pub fn exit_code(result: &Result<ReleaseReport, ReleaseError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Main pipeline orchestrator
pub struct PublishCoordinator {
    checkout: PathBuf,
    config: ReleaseConfig,
    registry: Arc<dyn RegistryClient>,
    host: Arc<dyn ReleaseHost>,
    packager: Arc<dyn Packager>,
    state_machine: ReleaseStateMachine,
}

impl PublishCoordinator {
    pub fn new<P: AsRef<Path>>(
        checkout: P,
        config: ReleaseConfig,
        registry: Arc<dyn RegistryClient>,
        host: Arc<dyn ReleaseHost>,
        packager: Arc<dyn Packager>,
    ) -> Self {
        Self {
            checkout: checkout.as_ref().to_path_buf(),
            config,
            registry,
            host,
            packager,
            state_machine: ReleaseStateMachine::new(),
        }
    }

    /// Current pipeline state
    pub fn state(&self) -> ReleaseState {
        self.state_machine.get_state()
    }

    /// Transition history for operator diagnostics
    pub fn history(&self) -> String {
        self.state_machine.get_history()
    }

    /// Run the pipeline to a terminal state
    pub async fn run(&mut self) -> Result<ReleaseReport, ReleaseError> {
        let started = Instant::now();

        match self.execute(started).await {
            Ok(report) => Ok(report),
            Err(error) => {
                self.state_machine.transition(ReleaseState::Failed);
                Err(error)
            }
        }
    }

    async fn execute(&mut self, started: Instant) -> Result<ReleaseReport, ReleaseError> {
        let manifest_path = self.checkout.join(self.config.manifest_path());
        let manifest = Manifest::load(&manifest_path).await?;

        println!("📦 {} {}", manifest.name, manifest.version);

        // 1. Gate: read the registry state once, then decide. The state is
        //    never re-read mid-run; the registry's own duplicate-version
        //    rejection is the only protection against a racing run.
        let registry_version = self.registry.lookup_latest(&manifest.name).await?;
        let decision = VersionGate::new().decide(&manifest.version, registry_version.as_ref());
        self.state_machine.transition(ReleaseState::Gated);

        if !decision.publish {
            self.state_machine.transition(ReleaseState::Skipped);
            println!("⏭️  {}", decision.reason());
            return Ok(self.report(&manifest, &decision, None, started));
        }

        println!("🔓 {}", decision.reason());

        // 2. Registry publish: the irreversible step.
        println!("📤 Publishing to {}...", self.registry.name());
        match self.registry.publish(&self.checkout).await? {
            RegistryPublishOutcome::Ok => {}
            RegistryPublishOutcome::Conflict => {
                return Err(ReleaseError::VersionConflict {
                    name: manifest.name.clone(),
                    version: manifest.version.clone(),
                });
            }
            RegistryPublishOutcome::AuthError { .. } => {
                return Err(ReleaseError::AuthenticationFailed {
                    stage: Stage::RegistryPublish,
                });
            }
            RegistryPublishOutcome::NetworkError { message } => {
                return Err(ReleaseError::NetworkError {
                    stage: Stage::RegistryPublish,
                    message,
                });
            }
        }

        self.state_machine.transition(ReleaseState::Published);
        println!("  ✅ Registry publish complete");

        // 3. Package and announce. The registry state has already changed,
        //    so any failure from here on is an inconsistent state that
        //    requires manual reconciliation.
        let record = match self.package_and_announce(&manifest).await {
            Ok(record) => record,
            Err(source) => {
                return Err(ReleaseError::InconsistentState {
                    version: manifest.version.clone(),
                    reason: source.to_string(),
                });
            }
        };

        self.state_machine.transition(ReleaseState::Announced);
        println!("  ✅ Release {} created", record.tag);

        self.state_machine.transition(ReleaseState::Done);
        Ok(self.report(&manifest, &decision, Some(record), started))
    }

    async fn package_and_announce(
        &mut self,
        manifest: &Manifest,
    ) -> Result<ReleaseRecord, ReleaseError> {
        println!("📦 Packaging artifact...");
        let artifact = self.packager.package(&self.checkout, manifest).await?;

        let tag = format!("{}{}", self.config.tag_prefix(), manifest.version);
        let request = ReleaseRequest {
            repository: self.config.repository.clone(),
            tag: tag.clone(),
            title: format!("{} {}", manifest.name, manifest.version),
            artifact_path: artifact.path.clone(),
            generate_notes: true,
            mark_latest: true,
        };

        println!("📣 Creating release {}...", tag);
        match self.host.create_release(&request).await? {
            ReleaseOutcome::Created(record) => Ok(record),
            ReleaseOutcome::DuplicateTag { tag } => Err(ReleaseError::DuplicateTag { tag }),
            ReleaseOutcome::AuthError { .. } => Err(ReleaseError::AuthenticationFailed {
                stage: Stage::Announce,
            }),
            ReleaseOutcome::NetworkError { message } => Err(ReleaseError::NetworkError {
                stage: Stage::Announce,
                message,
            }),
        }
    }

    fn report(
        &self,
        manifest: &Manifest,
        decision: &PublishDecision,
        release: Option<ReleaseRecord>,
        started: Instant,
    ) -> ReleaseReport {
        ReleaseReport {
            package: manifest.name.clone(),
            version: manifest.version.clone(),
            registry_version: decision.registry.clone(),
            state: self.state_machine.get_state(),
            release,
            finished_at: Utc::now(),
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}
