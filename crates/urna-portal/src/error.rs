//! Error types for the election catalogue

use urna_schema::SchemaError;

/// Catalogue lookup and loading errors
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// No election with this id
    #[error("election not found: {0}")]
    ElectionNotFound(String),

    /// No candidate with this slug in the election
    #[error("candidate '{slug}' not found in election {election}")]
    CandidateNotFound {
        /// Election searched
        election: String,
        /// Requested slug
        slug: String,
    },

    /// Status name outside `upcoming | ongoing | completed`
    #[error("unknown election status: {0}")]
    UnknownStatus(String),

    /// Dataset could not be decoded
    #[error("malformed dataset: {0}")]
    Dataset(#[from] serde_json::Error),

    /// Dataset decoded but references missing records
    #[error("inconsistent dataset: {0}")]
    Inconsistent(String),

    /// Options could not be turned into a form schema
    #[error("cannot build form from catalogue: {0}")]
    Schema(#[from] SchemaError),
}

impl DataError {
    /// Whether the request named something that does not exist
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ElectionNotFound(_) | Self::CandidateNotFound { .. }
        )
    }
}
