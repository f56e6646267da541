//! Snapshots of suspended operator trees.
//!
//! A [SavedOperator] mirrors the [PreemptableOperator](crate::PreemptableOperator) tree and
//! carries exactly what is needed to reconstruct each operator: the triple patterns, the offsets
//! at which scans resume, and the outer solution a join was processing. Snapshots are encoded into
//! a versioned binary format ([encode]/[decode]) and handed to clients as [ContinuationToken]s.

mod codec;
mod load;
mod token;

pub use codec::{decode, encode, SnapshotError, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
pub use load::load_operator;
pub use token::ContinuationToken;

use crate::expression::Expression;
use crate::operator::UnionMode;
use rdf_sage_model::serde_term;
use rdf_sage_model::{SolutionMapping, TriplePattern, Variable};
use serde::{Deserialize, Serialize};

/// The saved state of an operator tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavedOperator {
    Scan(SavedScan),
    NestedLoopJoin(SavedNestedLoopJoin),
    BindJoin(SavedBindJoin),
    BagUnion(SavedBagUnion),
    Filter(SavedFilter),
    Projection(SavedProjection),
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedScan {
    pub pattern: TriplePattern,
    pub cardinality: u64,
    /// The position in the pattern source at which the scan continues.
    pub offset: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedNestedLoopJoin {
    pub source: Box<SavedOperator>,
    /// The inner pattern, not yet bound with any outer solution.
    pub inner: TriplePattern,
    /// The outer solution that was being joined, if any.
    pub binding: Option<SolutionMapping>,
    /// The position of the inner scan for `binding`.
    pub offset: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBindJoin {
    /// The outer solutions that have not been joined yet.
    pub bindings: Vec<SolutionMapping>,
    pub inner: TriplePattern,
    pub binding: Option<SolutionMapping>,
    pub offset: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBagUnion {
    pub left: Box<SavedOperator>,
    pub right: Box<SavedOperator>,
    pub mode: UnionMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFilter {
    pub source: Box<SavedOperator>,
    pub expression: Expression,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProjection {
    pub source: Box<SavedOperator>,
    #[serde(with = "serde_term::variable_list")]
    pub variables: Option<Vec<Variable>>,
}

impl SavedOperator {
    /// Returns the name of the operator variant.
    pub fn name(&self) -> &'static str {
        match self {
            SavedOperator::Scan(_) => "Scan",
            SavedOperator::NestedLoopJoin(_) => "NestedLoopJoin",
            SavedOperator::BindJoin(_) => "BindJoin",
            SavedOperator::BagUnion(_) => "BagUnion",
            SavedOperator::Filter(_) => "Filter",
            SavedOperator::Projection(_) => "Projection",
            SavedOperator::Empty => "Empty",
        }
    }
}
