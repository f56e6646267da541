//! Contains the preemptable physical operators of RDF Sage.
//!
//! A physical plan is a tree of [PreemptableOperator]s. Each operator produces solutions one
//! [Step] at a time and can, between any two steps, [save](PreemptableOperator::save) its state
//! into a [SavedOperator]. The snapshot is sufficient to [load](snapshot::load_operator) an
//! operator that continues exactly where the saved one left off. Snapshots are handed to clients
//! as [ContinuationToken]s.

mod context;
mod error;
pub mod expression;
pub mod operator;
pub mod snapshot;
mod step;

pub use context::ExecutionContext;
pub use error::ExecutionError;
pub use operator::PreemptableOperator;
pub use snapshot::{ContinuationToken, SavedOperator, SnapshotError};
pub use step::Step;
