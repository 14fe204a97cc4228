//! Election data collaborator
//!
//! Read-only boundary the pages fetch from. Every call is an opaque
//! request/response; implementations decide where the records live.

use crate::error::DataError;
use crate::model::{Candidate, Election, ElectionResult, ElectionStats, ElectionStatus};
use async_trait::async_trait;

/// Read-only access to elections, candidates and counts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ElectionDataSource: Send + Sync {
    /// Every election, in catalogue order
    async fn elections(&self) -> Result<Vec<Election>, DataError>;

    /// Elections in one calendar status
    async fn elections_by_status(
        &self,
        status: ElectionStatus,
    ) -> Result<Vec<Election>, DataError> {
        let mut elections = self.elections().await?;
        elections.retain(|e| e.status == status);
        Ok(elections)
    }

    /// One election by id
    async fn election(&self, election_id: &str) -> Result<Election, DataError> {
        self.elections()
            .await?
            .into_iter()
            .find(|e| e.id == election_id)
            .ok_or_else(|| DataError::ElectionNotFound(election_id.to_string()))
    }

    /// Candidates on the ballot of an election
    async fn candidates(&self, election_id: &str) -> Result<Vec<Candidate>, DataError>;

    /// One candidate profile
    async fn candidate(&self, election_id: &str, slug: &str) -> Result<Candidate, DataError>;

    /// Vote counts and percentages
    async fn results(&self, election_id: &str) -> Result<ElectionResult, DataError>;

    /// Participation figures
    async fn stats(&self, election_id: &str) -> Result<ElectionStats, DataError>;
}
