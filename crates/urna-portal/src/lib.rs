//! Urna Portal - read-only election catalogue
//!
//! Supplies the records the election pages display and the options the
//! vote form is built from:
//! - Elections grouped by calendar status
//! - Candidate listings and profiles
//! - Result summaries and participation figures
//!
//! # Example
//!
//! ```rust
//! use urna_portal::{ElectionDataSource, InMemoryElectionData};
//!
//! # async fn example() -> Result<(), urna_portal::DataError> {
//! let data = InMemoryElectionData::embedded()?;
//! let results = data.results("municipal-sp-2024").await?;
//! assert_eq!(results.total_votes, 3500);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod model;
pub mod options;
pub mod source;

pub use error::DataError;
pub use memory::InMemoryElectionData;
pub use model::{
    Candidate, CandidateResult, Election, ElectionResult, ElectionStats, ElectionStatus,
    SUMMARY_CHARS,
};
pub use options::{candidate_options, vote_schema_for};
pub use source::ElectionDataSource;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for reading the catalogue
    pub use crate::{
        Candidate, DataError, Election, ElectionDataSource, ElectionStatus, InMemoryElectionData,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
