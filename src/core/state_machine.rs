//! State machine for tracking the release pipeline
//!
//! In-memory only: a retry is always a whole re-run from `Init`, so there
//! is no persistence or resume. The transition history is kept for
//! operator diagnostics on failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseState {
    Init,
    Gated,
    Published,
    Announced,
    Done,
    /// Gate decided not to publish. Terminal success, not a failure.
    Skipped,
    Failed,
}

impl ReleaseState {
    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReleaseState::Done | ReleaseState::Skipped | ReleaseState::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseState::Init => "INIT",
            ReleaseState::Gated => "GATED",
            ReleaseState::Published => "PUBLISHED",
            ReleaseState::Announced => "ANNOUNCED",
            ReleaseState::Done => "DONE",
            ReleaseState::Skipped => "SKIPPED",
            ReleaseState::Failed => "FAILED",
        }
    }
}

/// State transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateTransition {
    pub from: ReleaseState,
    pub to: ReleaseState,
    pub timestamp: DateTime<Utc>,
}

/// State machine for tracking the release pipeline
#[derive(Debug)]
pub struct ReleaseStateMachine {
    current_state: ReleaseState,
    transitions: Vec<StateTransition>,
}

impl Default for ReleaseStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseStateMachine {
    /// Create a new state machine in the `Init` state
    pub fn new() -> Self {
        Self {
            current_state: ReleaseState::Init,
            transitions: Vec::new(),
        }
    }

    /// Transition to a new state, recording the step in the history
    pub fn transition(&mut self, to: ReleaseState) {
        let transition = StateTransition {
            from: self.current_state,
            to,
            timestamp: Utc::now(),
        };

        self.transitions.push(transition);
        self.current_state = to;
    }

    /// Get current state
    pub fn get_state(&self) -> ReleaseState {
        self.current_state
    }

    /// Get elapsed time between the first and last transition
    pub fn get_elapsed_time(&self) -> i64 {
        if self.transitions.is_empty() {
            return 0;
        }

        let first_transition = &self.transitions[0];
        let last_transition = &self.transitions[self.transitions.len() - 1];

        (last_transition.timestamp - first_transition.timestamp).num_milliseconds()
    }

    /// Get transition history as human-readable string
    pub fn get_history(&self) -> String {
        self.transitions
            .iter()
            .map(|t| {
                format!(
                    "{}: {} → {}",
                    t.timestamp.to_rfc3339(),
                    t.from.as_str(),
                    t.to.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
