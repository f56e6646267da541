use rdf_sage_physical::{ExecutionError, SnapshotError};
use rdf_sage_storage::StorageError;
use spargebra::SparqlSyntaxError;
use std::convert::Infallible;

/// An error raised while evaluating a query.
///
/// Exhausting the quota or the result limit is not an error. Both end an execution successfully
/// with a continuation token.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryEvaluationError {
    /// An error in SPARQL parsing.
    #[error(transparent)]
    Parsing(#[from] SparqlSyntaxError),
    /// An error from the pattern source. The execution is aborted without a continuation token.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The query uses a feature that cannot be evaluated by preemptable operators.
    #[error("Unsupported query shape: {0}")]
    UnsupportedQueryShape(String),
    /// The continuation token cannot be decoded.
    #[error("Invalid continuation token: {0}")]
    InvalidContinuation(#[from] SnapshotError),
}

impl QueryEvaluationError {
    pub fn unsupported<T>(cause: impl Into<String>) -> Result<T, Self> {
        Err(QueryEvaluationError::UnsupportedQueryShape(cause.into()))
    }

    /// Returns `true` if the error is caused by the continuation token instead of the backend.
    pub fn is_invalid_continuation(&self) -> bool {
        matches!(self, QueryEvaluationError::InvalidContinuation(_))
    }
}

impl From<Infallible> for QueryEvaluationError {
    #[inline]
    fn from(error: Infallible) -> Self {
        match error {}
    }
}

impl From<ExecutionError> for QueryEvaluationError {
    fn from(error: ExecutionError) -> Self {
        match error {
            ExecutionError::Storage(error) => Self::Storage(error),
            ExecutionError::Snapshot(error) => Self::InvalidContinuation(error),
        }
    }
}
