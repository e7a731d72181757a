pub mod config;
pub mod error;
pub mod state_machine;
pub mod traits;

pub use self::config::ReleaseConfig;
pub use self::error::{ErrorKind, ReleaseError, Stage};
pub use self::state_machine::{ReleaseState, ReleaseStateMachine, StateTransition};
pub use self::traits::{
    Packager, RegistryClient, RegistryPublishOutcome, ReleaseHost, ReleaseOutcome, ReleaseRecord,
    ReleaseRequest,
};
