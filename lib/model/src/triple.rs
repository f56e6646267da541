use crate::TriplePosition;
use oxrdf::{Quad, Term, Triple};

/// A triple returned by a pattern source.
///
/// Unlike [Triple], all three positions are plain [Term]s. This keeps the engine independent of
/// the restrictions RDF places on subjects and predicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TermTriple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl TermTriple {
    pub fn new(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    pub fn get(&self, position: TriplePosition) -> &Term {
        match position {
            TriplePosition::Subject => &self.subject,
            TriplePosition::Predicate => &self.predicate,
            TriplePosition::Object => &self.object,
        }
    }
}

impl From<Triple> for TermTriple {
    fn from(value: Triple) -> Self {
        Self::new(value.subject, value.predicate, value.object)
    }
}

impl From<Quad> for TermTriple {
    fn from(value: Quad) -> Self {
        Self::new(value.subject, value.predicate, value.object)
    }
}
