use crate::config::SageConfig;
use crate::sparql::{QueryBranch, QueryEvaluationError, SageQuery};
use rdf_sage_model::{BasicGraphPattern, GraphName, TriplePattern, Variable};
use rdf_sage_physical::operator::{
    BagUnionOperator, FilterOperator, NestedLoopJoinOperator, ProjectionOperator, ScanOperator,
};
use rdf_sage_physical::expression::Expression;
use rdf_sage_physical::snapshot::load_operator;
use rdf_sage_physical::{ExecutionContext, PreemptableOperator, SavedOperator};
use rdf_sage_storage::PatternScan;
use std::collections::BTreeSet;

/// Builds preemptable plans for queries or reloads them from snapshots.
///
/// Every BGP becomes a left-linear tree of nested loop joins. The joins are ordered by the
/// cardinalities reported by the pattern source. Patterns with equal cardinalities are ordered by
/// the selectivity of their shape. Each conjunct of a branch's filter is placed directly above the
/// lowest join (or scan) that binds all of its variables.
#[derive(Debug)]
pub struct PlanBuilder<'a> {
    context: &'a ExecutionContext,
    config: &'a SageConfig,
}

/// A triple pattern together with the scan opened while estimating its cardinality.
struct Candidate {
    pattern: TriplePattern,
    scan: PatternScan,
}

impl Candidate {
    fn sort_key(&self) -> (u64, u8) {
        (self.scan.cardinality, self.pattern.shape().selectivity_rank())
    }
}

impl<'a> PlanBuilder<'a> {
    pub fn new(context: &'a ExecutionContext, config: &'a SageConfig) -> Self {
        Self { context, config }
    }

    /// Builds the plan of `query`. If `snapshot` is present, the plan is reconstructed from the
    /// snapshot instead and the query is not consulted.
    pub fn build(
        &self,
        query: &SageQuery,
        snapshot: Option<SavedOperator>,
    ) -> Result<PreemptableOperator, QueryEvaluationError> {
        if let Some(snapshot) = snapshot {
            return self.load(snapshot);
        }

        let mut plans = query
            .branches()
            .iter()
            .map(|branch| self.build_branch(branch))
            .collect::<Result<Vec<_>, _>>()?;
        let plan = match plans.len() {
            0 => return QueryEvaluationError::unsupported("A query without graph patterns"),
            1 => plans.pop().unwrap_or(PreemptableOperator::Empty),
            _ => self.build_union(plans),
        };

        Ok(match query.projection() {
            Some(variables) => ProjectionOperator::new(plan, Some(variables.to_vec())).into(),
            None => plan,
        })
    }

    /// Reconstructs a plan from a snapshot.
    pub fn load(
        &self,
        snapshot: SavedOperator,
    ) -> Result<PreemptableOperator, QueryEvaluationError> {
        tracing::debug!("Loading plan from {} snapshot", snapshot.name());
        Ok(load_operator(snapshot, self.context)?)
    }

    fn build_branch(
        &self,
        branch: &QueryBranch,
    ) -> Result<PreemptableOperator, QueryEvaluationError> {
        let conjuncts = branch
            .filter
            .clone()
            .map(Expression::into_conjuncts)
            .unwrap_or_default();
        self.build_bgp(&branch.patterns, conjuncts)
    }

    /// Builds a left-linear join tree for `bgp` and places the `conjuncts` of its filter inside
    /// the tree.
    ///
    /// Returns [PreemptableOperator::Empty] if the patterns are not connected by shared variables,
    /// as cross products are not evaluated.
    pub fn build_bgp(
        &self,
        bgp: &BasicGraphPattern,
        mut conjuncts: Vec<Expression>,
    ) -> Result<PreemptableOperator, QueryEvaluationError> {
        if bgp.is_empty() {
            return QueryEvaluationError::unsupported("An empty basic graph pattern");
        }

        let mut candidates = bgp
            .patterns
            .iter()
            .map(|pattern| -> Result<Candidate, QueryEvaluationError> {
                let pattern = self.localize(pattern);
                let scan = self.context.search(&pattern, 0)?;
                tracing::debug!(
                    "Pattern {pattern} has cardinality {} ({})",
                    scan.cardinality,
                    pattern.shape()
                );
                Ok(Candidate { pattern, scan })
            })
            .collect::<Result<Vec<_>, _>>()?;
        candidates.sort_by_key(Candidate::sort_key);

        let mut candidates = candidates.into_iter();
        let Some(seed) = candidates.next() else {
            return Ok(PreemptableOperator::Empty);
        };
        let mut variables: BTreeSet<Variable> = seed.pattern.variables();
        let mut plan: PreemptableOperator = ScanOperator::new(seed.pattern, seed.scan, 0).into();
        plan = push_filters(plan, &variables, &mut conjuncts);

        let mut remaining = candidates.map(|c| c.pattern).collect::<Vec<_>>();
        while !remaining.is_empty() {
            let Some(index) = remaining
                .iter()
                .position(|pattern| pattern.is_connected_to(&variables))
            else {
                tracing::debug!(
                    "Basic graph pattern is disconnected, {} patterns cannot be joined",
                    remaining.len()
                );
                return Ok(PreemptableOperator::Empty);
            };

            let pattern = remaining.remove(index);
            variables.extend(pattern.variables());
            plan = NestedLoopJoinOperator::new(plan, pattern).into();
            plan = push_filters(plan, &variables, &mut conjuncts);
        }

        // Conjuncts over variables that the BGP never binds.
        Ok(match Expression::conjunction(conjuncts) {
            Some(expression) => FilterOperator::new(plan, expression).into(),
            None => plan,
        })
    }

    /// Combines the plans pairwise into a balanced tree of bag unions.
    fn build_union(&self, mut plans: Vec<PreemptableOperator>) -> PreemptableOperator {
        while plans.len() > 1 {
            let mut level = Vec::with_capacity(plans.len().div_ceil(2));
            let mut plans_iter = plans.into_iter();
            while let Some(left) = plans_iter.next() {
                level.push(match plans_iter.next() {
                    Some(right) => {
                        BagUnionOperator::new(left, right, self.config.union_mode).into()
                    }
                    None => left,
                });
            }
            plans = level;
        }
        plans.pop().unwrap_or(PreemptableOperator::Empty)
    }

    fn localize(&self, pattern: &TriplePattern) -> TriplePattern {
        match &pattern.graph {
            GraphName::DefaultGraph => pattern.clone().in_graph(self.config.default_graph.clone()),
            GraphName::NamedNode(_) | GraphName::BlankNode(_) => pattern.clone(),
        }
    }
}

/// Places the conjuncts whose variables are all in `bound` above `plan` and removes them from
/// `conjuncts`.
fn push_filters(
    plan: PreemptableOperator,
    bound: &BTreeSet<Variable>,
    conjuncts: &mut Vec<Expression>,
) -> PreemptableOperator {
    let (ready, pending) = conjuncts
        .drain(..)
        .partition::<Vec<_>, _>(|conjunct| conjunct.variables().is_subset(bound));
    *conjuncts = pending;
    match Expression::conjunction(ready) {
        Some(expression) => FilterOperator::new(plan, expression).into(),
        None => plan,
    }
}
