use oxrdf::{TermParseError, VariableNameParseError};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A light-weight result, mainly used for SPARQL operations.
pub type ThinResult<T> = Result<T, ThinError>;

/// A thin error type that indicates an *expected* failure without any reason.
///
/// In SPARQL, many operations can fail. For example, because the input value had a different data
/// type. However, these errors are expected and are part of the query evaluation. As all of these
/// "expected" errors are treated equally in the query evaluation, we do not need to store a reason.
#[derive(Clone, Copy, Debug, Default, Error, PartialEq, Eq)]
pub struct ThinError {}

impl ThinError {
    /// Creates a result with a [ThinError].
    pub fn expected<T>() -> ThinResult<T> {
        Err(ThinError::default())
    }
}

impl Display for ThinError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("An expected error occurred.")
    }
}

/// An error raised while reading a pattern term from its textual form.
///
/// The textual form is either a SPARQL variable (`?name`) or an RDF term in N-Triples syntax.
#[derive(Debug, Error)]
pub enum PatternParseError {
    #[error(transparent)]
    Term(#[from] TermParseError),
    #[error(transparent)]
    Variable(#[from] VariableNameParseError),
    #[error("'{0}' cannot be used as a graph name")]
    InvalidGraphName(String),
}
