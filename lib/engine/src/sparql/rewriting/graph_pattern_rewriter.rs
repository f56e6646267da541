use crate::sparql::rewriting::expression_rewriter::ExpressionRewriter;
use crate::sparql::{QueryBranch, QueryEvaluationError, SageQuery};
use rdf_sage_model::{BlankNode, GraphName, PatternTerm, TriplePattern, Variable};
use rdf_sage_physical::expression::Expression;
use spargebra::algebra::GraphPattern;
use spargebra::term::{NamedNodePattern, TermPattern};
use spargebra::Query;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Rewrites a spargebra [Query] into a [SageQuery].
///
/// Only the fragment that can be evaluated by preemptable operators is supported: basic graph
/// patterns, `UNION`, `FILTER`, `GRAPH <iri>`, joins of these, and a projection at the root.
/// Unions are flattened into a list of branches. Filters and joins are distributed over the
/// branches.
#[derive(Debug, Default)]
pub struct GraphPatternRewriter {
    state: RefCell<RewritingState>,
}

#[derive(Debug, Default)]
struct RewritingState {
    /// Blank nodes in patterns act as variables that are never projected.
    blank_nodes: HashMap<BlankNode, Variable>,
    /// The variables of the query, which blank node variables must not shadow.
    reserved: HashSet<Variable>,
    next_blank_node: usize,
}

impl GraphPatternRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rewrite(&self, query: &Query) -> Result<SageQuery, QueryEvaluationError> {
        let (pattern, dataset) = match query {
            Query::Select {
                pattern, dataset, ..
            } => (pattern, dataset),
            Query::Construct { .. } => return QueryEvaluationError::unsupported("CONSTRUCT"),
            Query::Describe { .. } => return QueryEvaluationError::unsupported("DESCRIBE"),
            Query::Ask { .. } => return QueryEvaluationError::unsupported("ASK"),
        };
        if dataset.is_some() {
            return QueryEvaluationError::unsupported("FROM and FROM NAMED");
        }

        let (projection, inner) = match pattern {
            GraphPattern::Project { inner, variables } => (Some(variables.clone()), inner.as_ref()),
            pattern => (None, pattern),
        };

        let mut reserved = projection.iter().flatten().cloned().collect();
        reserve_variables(inner, &mut reserved)?;
        self.state.borrow_mut().reserved = reserved;

        let branches = self.rewrite_graph_pattern(inner, &GraphName::DefaultGraph)?;
        Ok(SageQuery::from_branches(branches, projection))
    }

    fn rewrite_graph_pattern(
        &self,
        pattern: &GraphPattern,
        graph: &GraphName,
    ) -> Result<Vec<QueryBranch>, QueryEvaluationError> {
        match pattern {
            GraphPattern::Bgp { patterns } => {
                let patterns = patterns
                    .iter()
                    .map(|pattern| self.rewrite_triple_pattern(pattern, graph))
                    .collect();
                Ok(vec![QueryBranch::new(patterns)])
            }
            GraphPattern::Filter { expr, inner } => {
                let expression = ExpressionRewriter.rewrite(expr)?;
                let branches = self.rewrite_graph_pattern(inner, graph)?;
                Ok(branches
                    .into_iter()
                    .map(|branch| branch.with_filter(expression.clone()))
                    .collect())
            }
            GraphPattern::Union { left, right } => {
                let mut branches = self.rewrite_graph_pattern(left, graph)?;
                branches.extend(self.rewrite_graph_pattern(right, graph)?);
                Ok(branches)
            }
            GraphPattern::Join { left, right } => {
                let left = self.rewrite_graph_pattern(left, graph)?;
                let right = self.rewrite_graph_pattern(right, graph)?;
                let mut branches = Vec::with_capacity(left.len() * right.len());
                for lhs in &left {
                    for rhs in &right {
                        branches.push(join_branches(lhs, rhs)?);
                    }
                }
                Ok(branches)
            }
            GraphPattern::Graph { name, inner } => match name {
                NamedNodePattern::NamedNode(node) => {
                    self.rewrite_graph_pattern(inner, &GraphName::NamedNode(node.clone()))
                }
                NamedNodePattern::Variable(_) => QueryEvaluationError::unsupported("GRAPH ?g"),
            },
            pattern => QueryEvaluationError::unsupported(pattern_name(pattern)),
        }
    }

    fn rewrite_triple_pattern(
        &self,
        pattern: &spargebra::term::TriplePattern,
        graph: &GraphName,
    ) -> TriplePattern {
        let predicate = match &pattern.predicate {
            NamedNodePattern::NamedNode(node) => PatternTerm::Term(node.clone().into()),
            NamedNodePattern::Variable(variable) => PatternTerm::Variable(variable.clone()),
        };
        TriplePattern::new(
            self.rewrite_term_pattern(&pattern.subject),
            predicate,
            self.rewrite_term_pattern(&pattern.object),
        )
        .in_graph(graph.clone())
    }

    fn rewrite_term_pattern(&self, pattern: &TermPattern) -> PatternTerm {
        match pattern {
            TermPattern::NamedNode(node) => PatternTerm::Term(node.clone().into()),
            TermPattern::Literal(literal) => PatternTerm::Term(literal.clone().into()),
            TermPattern::Variable(variable) => PatternTerm::Variable(variable.clone()),
            TermPattern::BlankNode(node) => PatternTerm::Variable(self.blank_node_variable(node)),
        }
    }

    fn blank_node_variable(&self, node: &BlankNode) -> Variable {
        let mut state = self.state.borrow_mut();
        if let Some(variable) = state.blank_nodes.get(node) {
            return variable.clone();
        }

        let variable = loop {
            let candidate = Variable::new_unchecked(format!("_bnode{}", state.next_blank_node));
            state.next_blank_node += 1;
            if !state.reserved.contains(&candidate) {
                break candidate;
            }
        };
        state.blank_nodes.insert(node.clone(), variable.clone());
        variable
    }
}

/// Collects the variables that `pattern` mentions in triple patterns and filters.
fn reserve_variables(
    pattern: &GraphPattern,
    variables: &mut HashSet<Variable>,
) -> Result<(), QueryEvaluationError> {
    match pattern {
        GraphPattern::Bgp { patterns } => {
            for pattern in patterns {
                for term in [&pattern.subject, &pattern.object] {
                    if let TermPattern::Variable(variable) = term {
                        variables.insert(variable.clone());
                    }
                }
                if let NamedNodePattern::Variable(variable) = &pattern.predicate {
                    variables.insert(variable.clone());
                }
            }
        }
        GraphPattern::Filter { expr, inner } => {
            variables.extend(ExpressionRewriter.rewrite(expr)?.variables());
            reserve_variables(inner, variables)?;
        }
        GraphPattern::Union { left, right } | GraphPattern::Join { left, right } => {
            reserve_variables(left, variables)?;
            reserve_variables(right, variables)?;
        }
        GraphPattern::Graph { inner, .. } => reserve_variables(inner, variables)?,
        _ => {}
    }
    Ok(())
}

/// Joins two branches by concatenating their patterns and filters.
///
/// A filter may only move to the joined branch if it does not depend on variables that only the
/// other branch binds.
fn join_branches(
    lhs: &QueryBranch,
    rhs: &QueryBranch,
) -> Result<QueryBranch, QueryEvaluationError> {
    for branch in [lhs, rhs] {
        if let Some(filter) = &branch.filter {
            let variables = branch.patterns.variables();
            if !filter.variables().is_subset(&variables) {
                return QueryEvaluationError::unsupported(
                    "A FILTER in a nested group that references variables of the outer group",
                );
            }
        }
    }

    let patterns = lhs
        .patterns
        .patterns
        .iter()
        .chain(&rhs.patterns.patterns)
        .cloned()
        .collect();
    let filter = Expression::conjunction(lhs.filter.iter().chain(&rhs.filter).cloned());
    Ok(QueryBranch { patterns, filter })
}

fn pattern_name(pattern: &GraphPattern) -> &'static str {
    match pattern {
        GraphPattern::Path { .. } => "Property paths",
        GraphPattern::LeftJoin { .. } => "OPTIONAL",
        GraphPattern::Minus { .. } => "MINUS",
        GraphPattern::Extend { .. } => "BIND",
        GraphPattern::Values { .. } => "VALUES",
        GraphPattern::OrderBy { .. } => "ORDER BY",
        GraphPattern::Project { .. } => "Sub-queries",
        GraphPattern::Distinct { .. } => "DISTINCT",
        GraphPattern::Reduced { .. } => "REDUCED",
        GraphPattern::Slice { .. } => "LIMIT and OFFSET",
        GraphPattern::Group { .. } => "GROUP BY and aggregates",
        GraphPattern::Service { .. } => "SERVICE",
        GraphPattern::Bgp { .. }
        | GraphPattern::Join { .. }
        | GraphPattern::Filter { .. }
        | GraphPattern::Union { .. }
        | GraphPattern::Graph { .. } => "This graph pattern",
    }
}
