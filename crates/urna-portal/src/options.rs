//! Catalogue → form option mapping

use crate::error::DataError;
use crate::model::Candidate;
use crate::source::ElectionDataSource;
use urna_schema::{vote_cast_schema, FormSchema, SelectOption};

/// One radio option per candidate, valued by candidate id
#[must_use]
pub fn candidate_options(candidates: &[Candidate]) -> Vec<SelectOption> {
    candidates
        .iter()
        .map(|c| SelectOption::new(c.id.as_str(), c.name.as_str()))
        .collect()
}

/// Vote form for the ballot of `election_id`
///
/// # Errors
/// - any lookup error of the data source
/// - `DataError::Schema` if the ballot is empty
pub async fn vote_schema_for<S>(source: &S, election_id: &str) -> Result<FormSchema, DataError>
where
    S: ElectionDataSource + ?Sized,
{
    let candidates = source.candidates(election_id).await?;
    Ok(vote_cast_schema(candidate_options(&candidates))?)
}
