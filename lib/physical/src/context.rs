use rdf_sage_model::TriplePattern;
use rdf_sage_storage::{PatternScan, PatternSource, StorageError};
use std::sync::Arc;

/// Provides the operators with access to the pattern source.
///
/// Operators never hold on to the pattern source themselves. This keeps them serializable and
/// allows the same plan to be resumed on a different instance of the backend.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    source: Arc<dyn PatternSource>,
}

impl ExecutionContext {
    pub fn new(source: Arc<dyn PatternSource>) -> Self {
        Self { source }
    }

    /// Evaluates `pattern`, skipping the first `offset` matches.
    pub fn search(
        &self,
        pattern: &TriplePattern,
        offset: u64,
    ) -> Result<PatternScan, StorageError> {
        self.source.search(pattern, offset)
    }
}
