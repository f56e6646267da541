//! The preemptable operators.
//!
//! Every operator implements the same single-step protocol:
//!
//! - `has_next` returns `false` once the operator can no longer produce solutions.
//! - `next` performs one scheduling step and returns a [Step]. A step is never interrupted.
//! - `save` captures the state of the operator (and its children) in a [SavedOperator].
//!
//! The scheduler (see `rdf-sage-engine`) owns the suspension. It calls `next` on the root operator
//! until its quota is exhausted and then saves the root.

mod filter;
mod join;
mod projection;
mod scan;
mod union;

pub use filter::FilterOperator;
pub use join::{BindJoinOperator, NestedLoopJoinOperator};
pub use projection::ProjectionOperator;
pub use scan::ScanOperator;
pub use union::{BagUnionOperator, UnionMode};

use crate::{ExecutionContext, ExecutionError, SavedOperator, Step};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// A node of a physical plan.
///
/// Each operator exclusively owns its children. The variant set is closed, which allows saving
/// and loading operators with exhaustive matches.
#[derive(Debug)]
pub enum PreemptableOperator {
    Scan(ScanOperator),
    NestedLoopJoin(NestedLoopJoinOperator),
    BindJoin(BindJoinOperator),
    BagUnion(BagUnionOperator),
    Filter(FilterOperator),
    Projection(ProjectionOperator),
    /// An operator that never produces a solution. Used for BGPs that would require a cross
    /// product.
    Empty,
}

impl PreemptableOperator {
    pub fn has_next(&self) -> bool {
        match self {
            PreemptableOperator::Scan(operator) => operator.has_next(),
            PreemptableOperator::NestedLoopJoin(operator) => operator.has_next(),
            PreemptableOperator::BindJoin(operator) => operator.has_next(),
            PreemptableOperator::BagUnion(operator) => operator.has_next(),
            PreemptableOperator::Filter(operator) => operator.has_next(),
            PreemptableOperator::Projection(operator) => operator.has_next(),
            PreemptableOperator::Empty => false,
        }
    }

    /// Performs a single scheduling step.
    pub fn next(&mut self, context: &ExecutionContext) -> Result<Step, ExecutionError> {
        match self {
            PreemptableOperator::Scan(operator) => Ok(operator.next()?),
            PreemptableOperator::NestedLoopJoin(operator) => operator.next(context),
            PreemptableOperator::BindJoin(operator) => operator.next(context),
            PreemptableOperator::BagUnion(operator) => operator.next(context),
            PreemptableOperator::Filter(operator) => operator.next(context),
            PreemptableOperator::Projection(operator) => operator.next(context),
            PreemptableOperator::Empty => Ok(Step::Exhausted),
        }
    }

    /// Captures the state of the operator tree.
    pub fn save(&self) -> SavedOperator {
        match self {
            PreemptableOperator::Scan(operator) => SavedOperator::Scan(operator.save()),
            PreemptableOperator::NestedLoopJoin(operator) => {
                SavedOperator::NestedLoopJoin(operator.save())
            }
            PreemptableOperator::BindJoin(operator) => SavedOperator::BindJoin(operator.save()),
            PreemptableOperator::BagUnion(operator) => SavedOperator::BagUnion(operator.save()),
            PreemptableOperator::Filter(operator) => SavedOperator::Filter(operator.save()),
            PreemptableOperator::Projection(operator) => {
                SavedOperator::Projection(operator.save())
            }
            PreemptableOperator::Empty => SavedOperator::Empty,
        }
    }

    fn fmt_indented(&self, f: &mut Formatter<'_>, depth: usize) -> std::fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            PreemptableOperator::Scan(operator) => writeln!(
                f,
                "{indent}Scan {} (cardinality: {}, offset: {})",
                operator.pattern(),
                operator.cardinality(),
                operator.position()
            ),
            PreemptableOperator::NestedLoopJoin(operator) => {
                writeln!(f, "{indent}NestedLoopJoin (inner: {})", operator.inner_pattern())?;
                operator.source().fmt_indented(f, depth + 1)
            }
            PreemptableOperator::BindJoin(operator) => writeln!(
                f,
                "{indent}BindJoin (bindings: {}, inner: {})",
                operator.pending_bindings(),
                operator.inner_pattern()
            ),
            PreemptableOperator::BagUnion(operator) => {
                writeln!(f, "{indent}BagUnion ({})", operator.mode())?;
                operator.left().fmt_indented(f, depth + 1)?;
                operator.right().fmt_indented(f, depth + 1)
            }
            PreemptableOperator::Filter(operator) => {
                writeln!(f, "{indent}Filter {}", operator.expression())?;
                operator.source().fmt_indented(f, depth + 1)
            }
            PreemptableOperator::Projection(operator) => {
                match operator.variables() {
                    Some(variables) => {
                        writeln!(f, "{indent}Projection ({})", variables.iter().join(", "))?;
                    }
                    None => writeln!(f, "{indent}Projection (*)")?,
                }
                operator.source().fmt_indented(f, depth + 1)
            }
            PreemptableOperator::Empty => writeln!(f, "{indent}Empty"),
        }
    }
}

/// Renders the operator tree, one operator per line.
impl Display for PreemptableOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl From<ScanOperator> for PreemptableOperator {
    fn from(value: ScanOperator) -> Self {
        PreemptableOperator::Scan(value)
    }
}

impl From<NestedLoopJoinOperator> for PreemptableOperator {
    fn from(value: NestedLoopJoinOperator) -> Self {
        PreemptableOperator::NestedLoopJoin(value)
    }
}

impl From<BindJoinOperator> for PreemptableOperator {
    fn from(value: BindJoinOperator) -> Self {
        PreemptableOperator::BindJoin(value)
    }
}

impl From<BagUnionOperator> for PreemptableOperator {
    fn from(value: BagUnionOperator) -> Self {
        PreemptableOperator::BagUnion(value)
    }
}

impl From<FilterOperator> for PreemptableOperator {
    fn from(value: FilterOperator) -> Self {
        PreemptableOperator::Filter(value)
    }
}

impl From<ProjectionOperator> for PreemptableOperator {
    fn from(value: ProjectionOperator) -> Self {
        PreemptableOperator::Projection(value)
    }
}
