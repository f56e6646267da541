use std::fmt::{Display, Formatter};

/// Classifies a triple pattern by which of its positions are bound.
///
/// The shape is used as a tie-breaker when ordering patterns with equal cardinalities. The ranking
/// follows the heuristics from Tsialiamanis et al., "Heuristics-based Query Optimisation for
/// SPARQL" (EDBT 2012).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatternShape {
    /// `spo`
    AllBound,
    /// `s?o`
    SubjectObject,
    /// `?po`
    PredicateObject,
    /// `sp?`
    SubjectPredicate,
    /// `??o`
    Object,
    /// `s??`
    Subject,
    /// `?p?`
    Predicate,
    /// `???`
    Unbound,
}

impl PatternShape {
    /// Creates the shape from the bound flags of the subject, predicate, and object.
    pub fn new(subject: bool, predicate: bool, object: bool) -> Self {
        match (subject, predicate, object) {
            (true, true, true) => PatternShape::AllBound,
            (true, false, true) => PatternShape::SubjectObject,
            (false, true, true) => PatternShape::PredicateObject,
            (true, true, false) => PatternShape::SubjectPredicate,
            (false, false, true) => PatternShape::Object,
            (true, false, false) => PatternShape::Subject,
            (false, true, false) => PatternShape::Predicate,
            (false, false, false) => PatternShape::Unbound,
        }
    }

    /// The heuristic selectivity rank. Lower is more selective.
    pub fn selectivity_rank(self) -> u8 {
        match self {
            PatternShape::AllBound => 1,
            PatternShape::SubjectObject => 2,
            PatternShape::PredicateObject => 3,
            PatternShape::SubjectPredicate => 4,
            PatternShape::Object => 5,
            PatternShape::Subject => 6,
            PatternShape::Predicate => 7,
            PatternShape::Unbound => 8,
        }
    }

    /// Number of bound positions.
    pub fn bound_count(self) -> usize {
        match self {
            PatternShape::AllBound => 3,
            PatternShape::SubjectObject
            | PatternShape::PredicateObject
            | PatternShape::SubjectPredicate => 2,
            PatternShape::Object | PatternShape::Subject | PatternShape::Predicate => 1,
            PatternShape::Unbound => 0,
        }
    }
}

impl Display for PatternShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PatternShape::AllBound => "spo",
            PatternShape::SubjectObject => "s?o",
            PatternShape::PredicateObject => "?po",
            PatternShape::SubjectPredicate => "sp?",
            PatternShape::Object => "??o",
            PatternShape::Subject => "s??",
            PatternShape::Predicate => "?p?",
            PatternShape::Unbound => "???",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_by_bound_positions() {
        let shapes = [
            PatternShape::AllBound,
            PatternShape::SubjectObject,
            PatternShape::PredicateObject,
            PatternShape::SubjectPredicate,
            PatternShape::Object,
            PatternShape::Subject,
            PatternShape::Predicate,
            PatternShape::Unbound,
        ];
        for pair in shapes.windows(2) {
            assert!(pair[0].selectivity_rank() < pair[1].selectivity_rank());
            assert!(pair[0].bound_count() >= pair[1].bound_count());
        }
    }

    #[test]
    fn display() {
        assert_eq!(PatternShape::new(true, false, true).to_string(), "s?o");
        assert_eq!(PatternShape::new(false, false, false).to_string(), "???");
    }
}
