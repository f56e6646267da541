use rdf_sage_model::SolutionMapping;

/// The outcome of a single scheduling step of an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The operator produced a solution.
    Solution(SolutionMapping),
    /// The operator did some work (e.g., advanced the outer side of a join) but has no solution
    /// yet. The operator may produce further solutions.
    NotYet,
    /// The operator will never produce a solution again.
    Exhausted,
}
