//! In-memory catalogue
//!
//! Seeded from a JSON dataset. The bundled dataset ships inside the binary.

use crate::error::DataError;
use crate::model::{Candidate, Election, ElectionResult, ElectionStats};
use crate::source::ElectionDataSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const EMBEDDED_DATASET: &str = include_str!("../fixtures/portal.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BallotEntry {
    candidate_id: String,
    votes: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElectionRecord {
    #[serde(flatten)]
    election: Election,
    total_voters: u64,
    #[serde(default)]
    ballot: Vec<BallotEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct Dataset {
    candidates: Vec<Candidate>,
    elections: Vec<ElectionRecord>,
}

/// Catalogue held entirely in memory
#[derive(Debug, Clone)]
pub struct InMemoryElectionData {
    candidates: Vec<Candidate>,
    elections: Vec<ElectionRecord>,
    latency: Duration,
}

impl InMemoryElectionData {
    /// Catalogue from the bundled dataset
    ///
    /// # Errors
    /// - `DataError::Dataset` / `DataError::Inconsistent` if the bundled file is broken
    pub fn embedded() -> Result<Self, DataError> {
        Self::from_json(EMBEDDED_DATASET)
    }

    /// Catalogue from a JSON document
    ///
    /// # Errors
    /// - `DataError::Dataset` on malformed JSON
    /// - `DataError::Inconsistent` if a ballot names an unknown candidate or
    ///   two elections share an id
    pub fn from_json(source: &str) -> Result<Self, DataError> {
        let dataset: Dataset = serde_json::from_str(source)?;

        for (i, record) in dataset.elections.iter().enumerate() {
            let id = &record.election.id;
            if dataset.elections[..i].iter().any(|r| &r.election.id == id) {
                return Err(DataError::Inconsistent(format!("election {id} listed twice")));
            }
            if let Some(entry) = record
                .ballot
                .iter()
                .find(|entry| !dataset.candidates.iter().any(|c| c.id == entry.candidate_id))
            {
                return Err(DataError::Inconsistent(format!(
                    "election {id} lists unknown candidate {}",
                    entry.candidate_id
                )));
            }
        }

        tracing::debug!(
            elections = dataset.elections.len(),
            candidates = dataset.candidates.len(),
            "election catalogue loaded"
        );
        Ok(Self {
            candidates: dataset.candidates,
            elections: dataset.elections,
            latency: Duration::ZERO,
        })
    }

    /// Delay every answer, like a remote service would
    #[inline]
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn respond(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn record(&self, election_id: &str) -> Result<&ElectionRecord, DataError> {
        self.elections
            .iter()
            .find(|r| r.election.id == election_id)
            .ok_or_else(|| DataError::ElectionNotFound(election_id.to_string()))
    }

    fn ballot(&self, record: &ElectionRecord) -> Vec<(&Candidate, u64)> {
        record
            .ballot
            .iter()
            .filter_map(|entry| {
                self.candidates
                    .iter()
                    .find(|c| c.id == entry.candidate_id)
                    .map(|c| (c, entry.votes))
            })
            .collect()
    }
}

#[async_trait]
impl ElectionDataSource for InMemoryElectionData {
    async fn elections(&self) -> Result<Vec<Election>, DataError> {
        self.respond().await;
        Ok(self.elections.iter().map(|r| r.election.clone()).collect())
    }

    async fn candidates(&self, election_id: &str) -> Result<Vec<Candidate>, DataError> {
        self.respond().await;
        let record = self.record(election_id)?;
        Ok(self
            .ballot(record)
            .into_iter()
            .map(|(c, _)| c.clone())
            .collect())
    }

    async fn candidate(&self, election_id: &str, slug: &str) -> Result<Candidate, DataError> {
        self.respond().await;
        let record = self.record(election_id)?;
        self.ballot(record)
            .into_iter()
            .find(|(c, _)| c.slug == slug)
            .map(|(c, _)| c.clone())
            .ok_or_else(|| DataError::CandidateNotFound {
                election: election_id.to_string(),
                slug: slug.to_string(),
            })
    }

    async fn results(&self, election_id: &str) -> Result<ElectionResult, DataError> {
        self.respond().await;
        let record = self.record(election_id)?;
        let counts = self
            .ballot(record)
            .into_iter()
            .map(|(c, votes)| (c.id.clone(), c.name.clone(), votes));
        Ok(ElectionResult::from_counts(election_id, counts))
    }

    async fn stats(&self, election_id: &str) -> Result<ElectionStats, DataError> {
        self.respond().await;
        let record = self.record(election_id)?;
        let votes: u64 = record.ballot.iter().map(|e| e.votes).sum();
        Ok(ElectionStats::new(
            record.total_voters,
            votes,
            record.ballot.len(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElectionStatus;

    #[test]
    fn embedded_dataset_loads() {
        let data = InMemoryElectionData::embedded().unwrap();
        assert_eq!(data.candidates.len(), 5);
        assert_eq!(data.elections.len(), 3);
    }

    #[test]
    fn unknown_ballot_candidate_is_rejected() {
        let json = r#"{
            "candidates": [],
            "elections": [{
                "id": "e", "title": "E", "council": "municipal-sp",
                "startDate": "2024-01-01", "endDate": "2024-01-02",
                "status": "ongoing", "totalVoters": 10,
                "ballot": [{ "candidateId": "9", "votes": 1 }]
            }]
        }"#;
        let err = InMemoryElectionData::from_json(json).unwrap_err();
        assert!(matches!(err, DataError::Inconsistent(msg) if msg.contains("candidate 9")));
    }

    #[test]
    fn malformed_json_is_a_dataset_error() {
        let err = InMemoryElectionData::from_json("{").unwrap_err();
        assert!(matches!(err, DataError::Dataset(_)));
    }

    #[tokio::test]
    async fn filters_by_status() {
        let data = InMemoryElectionData::embedded().unwrap();
        let ongoing = data.elections_by_status(ElectionStatus::Ongoing).await.unwrap();
        assert_eq!(ongoing.len(), 1);
        assert_eq!(ongoing[0].id, "municipal-sp-2024");
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_applied() {
        let data = InMemoryElectionData::embedded()
            .unwrap()
            .with_latency(Duration::from_secs(1));
        let started = tokio::time::Instant::now();
        data.elections().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
    }
}
