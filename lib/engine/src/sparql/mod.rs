//! The SPARQL fragment supported by RDF Sage.
//!
//! A [SageQuery] is a union of [QueryBranch]es, each one a basic graph pattern with an optional
//! filter, and an optional projection. Queries are either parsed from SPARQL or built
//! programmatically.

mod error;
mod rewriting;

pub use error::QueryEvaluationError;
pub use rewriting::GraphPatternRewriter;
pub use spargebra::SparqlSyntaxError;

use rdf_sage_model::{BasicGraphPattern, TriplePattern, Variable};
use rdf_sage_physical::expression::Expression;
use std::fmt::{Display, Formatter};

/// A query that can be evaluated with preemptable operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SageQuery {
    branches: Vec<QueryBranch>,
    projection: Option<Vec<Variable>>,
}

/// A single basic graph pattern of a [SageQuery] with the filter that applies to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBranch {
    pub patterns: BasicGraphPattern,
    pub filter: Option<Expression>,
}

impl QueryBranch {
    pub fn new(patterns: BasicGraphPattern) -> Self {
        Self {
            patterns,
            filter: None,
        }
    }

    /// Adds `expression` to the filter of this branch.
    #[must_use]
    pub fn with_filter(self, expression: Expression) -> Self {
        Self {
            patterns: self.patterns,
            filter: Expression::conjunction(self.filter.into_iter().chain([expression])),
        }
    }
}

impl SageQuery {
    /// Parses a SPARQL `SELECT` query.
    ///
    /// Returns [QueryEvaluationError::UnsupportedQueryShape] if the query uses a feature beyond
    /// basic graph patterns, `UNION`, `FILTER`, `GRAPH <iri>`, and projection.
    pub fn parse(query: &str, base_iri: Option<&str>) -> Result<Self, QueryEvaluationError> {
        let query = spargebra::Query::parse(query, base_iri)?;
        GraphPatternRewriter::new().rewrite(&query)
    }

    /// Creates a query for a single basic graph pattern.
    pub fn bgp(patterns: impl IntoIterator<Item = TriplePattern>) -> Self {
        Self::union([patterns.into_iter().collect()])
    }

    /// Creates a query for the union of multiple basic graph patterns.
    pub fn union(bgps: impl IntoIterator<Item = BasicGraphPattern>) -> Self {
        Self::from_branches(bgps.into_iter().map(QueryBranch::new).collect(), None)
    }

    pub fn from_branches(branches: Vec<QueryBranch>, projection: Option<Vec<Variable>>) -> Self {
        Self {
            branches,
            projection,
        }
    }

    /// Adds a filter to every branch.
    #[must_use]
    pub fn with_filter(mut self, expression: Expression) -> Self {
        self.branches = self
            .branches
            .into_iter()
            .map(|branch| branch.with_filter(expression.clone()))
            .collect();
        self
    }

    #[must_use]
    pub fn with_projection(mut self, variables: Vec<Variable>) -> Self {
        self.projection = Some(variables);
        self
    }

    pub fn branches(&self) -> &[QueryBranch] {
        &self.branches
    }

    pub fn projection(&self) -> Option<&[Variable]> {
        self.projection.as_deref()
    }
}

impl Display for SageQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.projection {
            Some(variables) => {
                f.write_str("SELECT")?;
                for variable in variables {
                    write!(f, " {variable}")?;
                }
            }
            None => f.write_str("SELECT *")?,
        }
        f.write_str(" WHERE {")?;
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                f.write_str(" UNION")?;
            }
            f.write_str(" {")?;
            for pattern in &branch.patterns.patterns {
                write!(f, " {pattern} .")?;
            }
            if let Some(filter) = &branch.filter {
                write!(f, " FILTER {filter}")?;
            }
            f.write_str(" }")?;
        }
        f.write_str(" }")
    }
}
