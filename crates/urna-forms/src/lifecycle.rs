//! Submission lifecycle
//!
//! `idle → validating → submitting → succeeded | failed → idle`, with
//! `validating → idle` when validation fails. Every other edge is illegal.

use crate::error::LifecycleError;
use serde::{Deserialize, Serialize};

/// Phase of one form's submission lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    /// Accepting input and submit requests
    #[default]
    Idle,
    /// Running the validator on a submit request
    Validating,
    /// Waiting on the submission collaborator
    Submitting,
    /// Collaborator accepted the values
    Succeeded,
    /// Collaborator rejected or timed out
    Failed,
}

impl SubmissionPhase {
    /// Every phase
    pub const ALL: [SubmissionPhase; 5] = [
        Self::Idle,
        Self::Validating,
        Self::Submitting,
        Self::Succeeded,
        Self::Failed,
    ];

    /// Submit action is disabled in this phase
    #[inline]
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }

    /// One attempt has settled
    #[inline]
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phases reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: SubmissionPhase) -> &'static [SubmissionPhase] {
    use SubmissionPhase::{Failed, Idle, Submitting, Succeeded, Validating};
    match from {
        Idle => &[Validating],
        Validating => &[Submitting, Idle],
        Submitting => &[Succeeded, Failed],
        Succeeded | Failed => &[Idle],
    }
}

/// Check a single transition
///
/// # Errors
/// - `LifecycleError::IllegalTransition` if `to` is not reachable from `from`
pub fn validate_transition(
    from: SubmissionPhase,
    to: SubmissionPhase,
) -> Result<(), LifecycleError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(LifecycleError::IllegalTransition { from, to })
    }
}

/// Lifecycle of one form instance, with the phases it has passed through
#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: SubmissionPhase,
    history: Vec<SubmissionPhase>,
}

impl Lifecycle {
    /// Start in `idle`
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            history: vec![SubmissionPhase::Idle],
        }
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Every phase entered so far, starting with the initial `idle`
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[SubmissionPhase] {
        &self.history
    }

    /// Move to `to`
    ///
    /// # Errors
    /// - `LifecycleError::IllegalTransition` and the phase is left unchanged
    pub fn transition(&mut self, to: SubmissionPhase) -> Result<(), LifecycleError> {
        validate_transition(self.phase, to)?;
        tracing::debug!(from = %self.phase, to = %to, "submission phase");
        self.phase = to;
        self.history.push(to);
        Ok(())
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
