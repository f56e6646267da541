use crate::SnapshotError;
use rdf_sage_storage::StorageError;

/// An error raised while executing or loading a physical plan.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The pattern source failed. The state of the plan may be inconsistent and must not be saved.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A snapshot could not be restored.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
