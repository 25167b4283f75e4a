//! Tagged result of one query attempt

use crate::error::{ErrorKind, QueryError};
use crate::model::SearchResult;

/// What a single query produced.
///
/// `Success` always carries at least one result; a successful exchange that
/// returned nothing is represented by `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Ranked results in backend order
    Success(Vec<SearchResult>),
    /// The request succeeded but matched nothing
    Empty,
    /// The request failed
    Failed(QueryError),
}

impl QueryOutcome {
    /// Wrap a validated result list, normalizing an empty list to `Empty`
    pub fn from_results(results: Vec<SearchResult>) -> Self {
        if results.is_empty() {
            QueryOutcome::Empty
        } else {
            QueryOutcome::Success(results)
        }
    }

    /// Results of a successful query (empty slice otherwise)
    pub fn results(&self) -> &[SearchResult] {
        match self {
            QueryOutcome::Success(results) => results,
            _ => &[],
        }
    }

    /// Number of results before any truncation
    pub fn result_count(&self) -> usize {
        self.results().len()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, QueryOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            QueryOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error().map(QueryError::kind)
    }
}

impl From<Result<Vec<SearchResult>, QueryError>> for QueryOutcome {
    fn from(result: Result<Vec<SearchResult>, QueryError>) -> Self {
        match result {
            Ok(results) => QueryOutcome::from_results(results),
            Err(err) => QueryOutcome::Failed(err),
        }
    }
}
