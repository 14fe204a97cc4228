//! Error types for Urna Forms
//!
//! Covers:
//! - Contract violations (unknown fields, illegal lifecycle transitions)
//! - Submission failures reported by the collaborator
//! - Use of a form after it was unmounted
//! - Configuration loading

use crate::lifecycle::SubmissionPhase;
use urna_schema::SchemaError;

/// Main form error type
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Caller referenced a field or schema incorrectly
    #[error("schema contract violated: {0}")]
    Schema(#[from] SchemaError),

    /// State machine was driven through an illegal edge
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Form instance was torn down
    #[error("form was unmounted")]
    Unmounted,

    /// Input arrived while a submission was in flight
    #[error("form is busy submitting")]
    Busy,
}

impl FormError {
    /// Whether the error is a programming defect rather than a runtime condition
    #[inline]
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Schema(_) | Self::Lifecycle(_))
    }
}

/// Illegal submission lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The edge is not part of the lifecycle
    #[error("illegal transition {from} -> {to}")]
    IllegalTransition {
        /// Phase before
        from: SubmissionPhase,
        /// Requested phase
        to: SubmissionPhase,
    },
}

/// Failure reported for one submission attempt
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// Receiving side refused the submission
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// Receiving side could not be reached
    #[error("submission service unavailable: {0}")]
    Unavailable(String),

    /// No answer within the configured bound
    #[error("submission timed out after {timeout_ms}ms")]
    TimedOut {
        /// Bound that expired
        timeout_ms: u64,
    },
}

impl SubmissionError {
    /// Whether resubmitting the same values may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::TimedOut { .. })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for [`crate::FormsConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value outside its accepted range
    #[error("invalid config value for {key}: {reason}")]
    InvalidValue {
        /// Offending key
        key: &'static str,
        /// Why it was rejected
        reason: String,
    },
}
