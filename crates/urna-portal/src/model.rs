//! Catalogue records
//!
//! Elections, candidate profiles and the figures derived from ballot counts.

use crate::error::DataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Characters of biography shown in a candidate listing
pub const SUMMARY_CHARS: usize = 100;

/// Where an election is in its calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionStatus {
    /// Voting has not opened
    Upcoming,
    /// Voting is open
    #[default]
    Ongoing,
    /// Voting has closed
    Completed,
}

impl ElectionStatus {
    /// Every status, in listing order
    pub const ALL: [ElectionStatus; 3] = [Self::Upcoming, Self::Ongoing, Self::Completed];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }

    /// Tab label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Próximas",
            Self::Ongoing => "Em Andamento",
            Self::Completed => "Concluídas",
        }
    }
}

impl std::fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElectionStatus {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DataError::UnknownStatus(s.to_string()))
    }
}

/// One council election
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    /// Stable identifier used in lookups
    pub id: String,
    /// Display title
    pub title: String,
    /// Council the election fills, matching a council option value
    pub council: String,
    /// First voting day
    pub start_date: NaiveDate,
    /// Last voting day
    pub end_date: NaiveDate,
    /// Calendar status
    pub status: ElectionStatus,
}

/// Public profile of a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Identifier submitted by the vote form
    pub id: String,
    /// URL-safe profile key
    pub slug: String,
    /// Display name
    pub name: String,
    /// Portrait location
    pub avatar_url: String,
    /// Free-text biography
    pub biography: String,
    /// Proposals, one per entry
    #[serde(default)]
    pub proposals: Vec<String>,
    /// Experience, one per entry
    #[serde(default)]
    pub experience: Vec<String>,
}

impl Candidate {
    /// Biography cut to [`SUMMARY_CHARS`] characters, with an ellipsis when cut
    #[must_use]
    pub fn summary(&self) -> String {
        if self.biography.chars().count() > SUMMARY_CHARS {
            let cut: String = self.biography.chars().take(SUMMARY_CHARS).collect();
            format!("{cut}...")
        } else {
            self.biography.clone()
        }
    }

    /// Avatar fallback letter
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

/// Votes received by one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResult {
    /// Candidate id
    pub id: String,
    /// Candidate name
    pub name: String,
    /// Votes counted
    pub votes: u64,
    /// Share of the total, 0 to 100
    pub percentage: f64,
}

/// Result summary of an election
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResult {
    /// Election the summary belongs to
    pub election_id: String,
    /// Sum of all candidate votes
    pub total_votes: u64,
    /// Per-candidate breakdown, in ballot order
    pub candidates: Vec<CandidateResult>,
}

impl ElectionResult {
    /// Build a summary from raw `(id, name, votes)` counts
    #[must_use]
    pub fn from_counts<I>(election_id: impl Into<String>, counts: I) -> Self
    where
        I: IntoIterator<Item = (String, String, u64)>,
    {
        let counts: Vec<_> = counts.into_iter().collect();
        let total_votes: u64 = counts.iter().map(|(_, _, votes)| votes).sum();
        let candidates = counts
            .into_iter()
            .map(|(id, name, votes)| CandidateResult {
                id,
                name,
                votes,
                percentage: ratio(votes, total_votes) * 100.0,
            })
            .collect();

        Self {
            election_id: election_id.into(),
            total_votes,
            candidates,
        }
    }

    /// Candidate with the most votes; the first listed wins a tie
    #[must_use]
    pub fn leader(&self) -> Option<&CandidateResult> {
        self.candidates
            .iter()
            .fold(None, |best: Option<&CandidateResult>, c| match best {
                Some(b) if b.votes >= c.votes => Some(b),
                _ => Some(c),
            })
    }
}

/// Participation figures for the data panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionStats {
    /// Registered voters
    pub total_voters: u64,
    /// Votes counted so far
    pub votes_count: u64,
    /// `votes_count / total_voters`, 0 to 1
    pub turnout: f64,
    /// Candidates on the ballot
    pub candidates_count: usize,
    /// Turnout as a percentage, 0 to 100
    pub voting_progress: f64,
}

impl ElectionStats {
    /// Derive the panel from registered voters, counted votes and ballot size
    #[must_use]
    pub fn new(total_voters: u64, votes_count: u64, candidates_count: usize) -> Self {
        let turnout = ratio(votes_count, total_voters);
        Self {
            total_voters,
            votes_count,
            turnout,
            candidates_count,
            voting_progress: turnout * 100.0,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
