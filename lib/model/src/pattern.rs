use crate::serde_term;
use crate::{PatternParseError, PatternShape, SolutionMapping};
use oxrdf::{GraphName, Term, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One of the three positions of a triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TriplePosition {
    Subject,
    Predicate,
    Object,
}

impl TriplePosition {
    /// All positions, in triple order.
    pub const ALL: [TriplePosition; 3] = [
        TriplePosition::Subject,
        TriplePosition::Predicate,
        TriplePosition::Object,
    ];
}

/// A single position of a [TriplePattern]: either a bound RDF term or a variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PatternTerm {
    Variable(Variable),
    Term(Term),
}

impl PatternTerm {
    /// Returns the variable if this position is not bound.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            PatternTerm::Variable(variable) => Some(variable),
            PatternTerm::Term(_) => None,
        }
    }

    /// Returns the term if this position is bound.
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            PatternTerm::Variable(_) => None,
            PatternTerm::Term(term) => Some(term),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, PatternTerm::Term(_))
    }

    /// Substitutes the variable with its value in `mapping`, if there is one.
    #[must_use]
    pub fn bind(&self, mapping: &SolutionMapping) -> PatternTerm {
        match self {
            PatternTerm::Variable(variable) => mapping
                .get(variable)
                .map_or_else(|| self.clone(), |term| PatternTerm::Term(term.clone())),
            PatternTerm::Term(_) => self.clone(),
        }
    }
}

impl Display for PatternTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternTerm::Variable(variable) => write!(f, "{variable}"),
            PatternTerm::Term(term) => write!(f, "{term}"),
        }
    }
}

impl FromStr for PatternTerm {
    type Err = PatternParseError;

    /// Parses a SPARQL variable (`?name` or `$name`) or an N-Triples term.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(name) = value.strip_prefix('?').or_else(|| value.strip_prefix('$')) {
            return Ok(PatternTerm::Variable(Variable::new(name)?));
        }
        Ok(PatternTerm::Term(Term::from_str(value)?))
    }
}

impl TryFrom<String> for PatternTerm {
    type Error = PatternParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PatternTerm> for String {
    fn from(value: PatternTerm) -> Self {
        value.to_string()
    }
}

impl From<Variable> for PatternTerm {
    fn from(value: Variable) -> Self {
        PatternTerm::Variable(value)
    }
}

impl From<Term> for PatternTerm {
    fn from(value: Term) -> Self {
        PatternTerm::Term(value)
    }
}

/// A triple pattern localized on a graph.
///
/// Each position is either bound to an RDF term or a variable. The pattern is evaluated against
/// `graph`, which is the default graph unless the pattern stems from a `GRAPH <g>` clause.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
    #[serde(with = "serde_term::graph_name")]
    pub graph: GraphName,
}

impl TriplePattern {
    /// Creates a new [TriplePattern] on the default graph.
    pub fn new(
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            graph: GraphName::DefaultGraph,
        }
    }

    /// Parses the three positions from their textual form (see [PatternTerm::from_str]).
    pub fn parse(subject: &str, predicate: &str, object: &str) -> Result<Self, PatternParseError> {
        Ok(Self::new(
            subject.parse::<PatternTerm>()?,
            predicate.parse::<PatternTerm>()?,
            object.parse::<PatternTerm>()?,
        ))
    }

    /// Moves the pattern to another graph.
    #[must_use]
    pub fn in_graph(mut self, graph: GraphName) -> Self {
        self.graph = graph;
        self
    }

    pub fn get(&self, position: TriplePosition) -> &PatternTerm {
        match position {
            TriplePosition::Subject => &self.subject,
            TriplePosition::Predicate => &self.predicate,
            TriplePosition::Object => &self.object,
        }
    }

    /// Returns the variable of each position, in triple order.
    pub fn variable_positions(&self) -> [Option<&Variable>; 3] {
        [
            self.subject.as_variable(),
            self.predicate.as_variable(),
            self.object.as_variable(),
        ]
    }

    /// Returns the set of distinct variables in this pattern.
    pub fn variables(&self) -> BTreeSet<Variable> {
        self.variable_positions()
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Returns true if the pattern shares at least one variable with `variables`.
    pub fn is_connected_to(&self, variables: &BTreeSet<Variable>) -> bool {
        self.variable_positions()
            .into_iter()
            .flatten()
            .any(|variable| variables.contains(variable))
    }

    pub fn shape(&self) -> PatternShape {
        PatternShape::new(
            self.subject.is_bound(),
            self.predicate.is_bound(),
            self.object.is_bound(),
        )
    }

    /// Substitutes all variables bound in `mapping` with their values.
    #[must_use]
    pub fn bind(&self, mapping: &SolutionMapping) -> TriplePattern {
        TriplePattern {
            subject: self.subject.bind(mapping),
            predicate: self.predicate.bind(mapping),
            object: self.object.bind(mapping),
            graph: self.graph.clone(),
        }
    }
}

impl Display for TriplePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if !self.graph.is_default_graph() {
            write!(f, " GRAPH {}", self.graph)?;
        }
        Ok(())
    }
}

/// A Basic Graph Pattern, i.e., a conjunction of triple patterns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasicGraphPattern {
    pub patterns: Vec<TriplePattern>,
}

impl BasicGraphPattern {
    pub fn new(patterns: Vec<TriplePattern>) -> Self {
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns the set of variables that appear in any of the patterns.
    pub fn variables(&self) -> BTreeSet<Variable> {
        self.patterns
            .iter()
            .flat_map(TriplePattern::variables)
            .collect()
    }
}

impl FromIterator<TriplePattern> for BasicGraphPattern {
    fn from_iter<T: IntoIterator<Item = TriplePattern>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode};

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    #[test]
    fn parse_and_display_pattern() {
        let pattern = TriplePattern::parse("?s", "<http://ex.org/p>", "\"X\"").unwrap();
        insta::assert_snapshot!(pattern, @r#"?s <http://ex.org/p> "X""#);
        assert_eq!(pattern.shape(), PatternShape::PredicateObject);
    }

    #[test]
    fn display_named_graph() {
        let pattern = TriplePattern::parse("?s", "?p", "?o")
            .unwrap()
            .in_graph(NamedNode::new_unchecked("http://ex.org/g").into());
        assert_eq!(pattern.to_string(), "?s ?p ?o GRAPH <http://ex.org/g>");
    }

    #[test]
    fn bind_substitutes_known_variables_only() {
        let pattern = TriplePattern::parse("?s", "<http://ex.org/p>", "?o").unwrap();
        let mapping: SolutionMapping = [(
            var("s"),
            Term::from(NamedNode::new_unchecked("http://ex.org/a")),
        )]
        .into_iter()
        .collect();

        let bound = pattern.bind(&mapping);

        assert_eq!(bound.to_string(), "<http://ex.org/a> <http://ex.org/p> ?o");
        assert_eq!(bound.variables(), BTreeSet::from([var("o")]));
    }

    #[test]
    fn connectivity() {
        let pattern = TriplePattern::parse("?s", "<http://ex.org/p>", "?o").unwrap();
        assert!(pattern.is_connected_to(&BTreeSet::from([var("o")])));
        assert!(!pattern.is_connected_to(&BTreeSet::from([var("x")])));
    }

    #[test]
    fn pattern_term_parses_dollar_variables_and_literals() {
        assert_eq!(
            "$x".parse::<PatternTerm>().unwrap(),
            PatternTerm::Variable(var("x"))
        );
        assert_eq!(
            "\"chat\"@fr".parse::<PatternTerm>().unwrap(),
            PatternTerm::Term(Literal::new_language_tagged_literal_unchecked("chat", "fr").into())
        );
        assert!("not a term".parse::<PatternTerm>().is_err());
    }

    #[test]
    fn pattern_survives_postcard() {
        let pattern = TriplePattern::parse("?s", "<http://ex.org/p>", "\"a \\\"quoted\\\" b\"")
            .unwrap()
            .in_graph(NamedNode::new_unchecked("http://ex.org/g").into());
        let bytes = postcard::to_allocvec(&pattern).unwrap();
        let decoded: TriplePattern = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, pattern);
    }
}
