//! Submission collaborator
//!
//! The receiving side of a submission is owned outside the form core. The
//! core only needs to know whether a validated value map was accepted.

use crate::error::SubmissionError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::time::Duration;
use urna_schema::{FieldValues, FormKind};

/// Asynchronous submission capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionCollaborator: Send + Sync {
    /// Submit validated values for one form kind
    async fn submit(&self, kind: FormKind, values: &FieldValues) -> Result<(), SubmissionError>;
}

/// Submission accepted by [`SimulatedCollaborator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    /// Form the values came from
    pub kind: FormKind,
    /// Values as received
    pub values: FieldValues,
    /// Time of acceptance
    pub received_at: DateTime<Utc>,
}

/// In-memory stand-in for the election service
///
/// Waits `latency` and then accepts, unless configured to reject.
#[derive(Debug, Default)]
pub struct SimulatedCollaborator {
    latency: Duration,
    reject_with: Option<String>,
    received: Mutex<Vec<SubmissionRecord>>,
}

impl SimulatedCollaborator {
    /// Accept every submission after `latency`
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            reject_with: None,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Reject every submission with `reason` after the latency
    #[must_use]
    pub fn rejecting(mut self, reason: impl Into<String>) -> Self {
        self.reject_with = Some(reason.into());
        self
    }

    /// Accepted submissions, in arrival order
    #[must_use]
    pub fn received(&self) -> Vec<SubmissionRecord> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl SubmissionCollaborator for SimulatedCollaborator {
    async fn submit(&self, kind: FormKind, values: &FieldValues) -> Result<(), SubmissionError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if let Some(reason) = &self.reject_with {
            tracing::info!(form = %kind, %reason, "simulated submission rejected");
            return Err(SubmissionError::Rejected(reason.clone()));
        }

        self.received.lock().push(SubmissionRecord {
            kind,
            values: values.clone(),
            received_at: Utc::now(),
        });
        tracing::info!(form = %kind, fields = values.len(), "simulated submission accepted");
        Ok(())
    }
}
