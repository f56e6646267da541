use crate::StorageError;
use rdf_sage_model::{TermTriple, TriplePattern};
use std::fmt::Debug;

/// The capability every storage backend offers to the query engine: evaluating a single triple
/// pattern.
///
/// # Ordering
///
/// The triples returned for a pattern must be deterministically ordered for a fixed state of the
/// backend. The `offset` passed to [PatternSource::search] refers to this order, and suspended
/// scans are resumed by searching the same pattern again with a larger offset.
///
/// # Graphs
///
/// The pattern carries the graph that should be searched. Searching a graph that does not exist
/// is not an error; it simply produces no triples.
pub trait PatternSource: Debug + Send + Sync {
    /// Evaluates `pattern`, skipping the first `offset` matching triples.
    ///
    /// Bound positions of the pattern must match exactly, while variables match anything. The
    /// backend does not check whether a variable occurs more than once in the pattern.
    fn search(&self, pattern: &TriplePattern, offset: u64) -> Result<PatternScan, StorageError>;
}

/// A cursor over the triples matching a pattern.
pub trait TripleCursor: Send {
    /// Returns `true` if a call to [TripleCursor::next_triple] may produce another triple.
    fn has_next(&self) -> bool;

    /// Returns the next triple, or [None] if the cursor is exhausted.
    fn next_triple(&mut self) -> Result<Option<TermTriple>, StorageError>;
}

/// The result of [PatternSource::search].
pub struct PatternScan {
    /// The triples, starting at the requested offset.
    pub cursor: Box<dyn TripleCursor>,
    /// The number of triples matching the pattern, ignoring the offset.
    ///
    /// Backends may return an upper-bound estimate. The query engine only uses this value for
    /// join ordering.
    pub cardinality: u64,
}

impl PatternScan {
    pub fn new(cursor: impl TripleCursor + 'static, cardinality: u64) -> Self {
        Self {
            cursor: Box::new(cursor),
            cardinality,
        }
    }

    /// A scan without any triples.
    pub fn empty() -> Self {
        Self::new(EmptyCursor, 0)
    }
}

impl Debug for PatternScan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternScan")
            .field("has_next", &self.cursor.has_next())
            .field("cardinality", &self.cardinality)
            .finish()
    }
}

/// A [TripleCursor] that never produces a triple.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyCursor;

impl TripleCursor for EmptyCursor {
    fn has_next(&self) -> bool {
        false
    }

    fn next_triple(&mut self) -> Result<Option<TermTriple>, StorageError> {
        Ok(None)
    }
}
