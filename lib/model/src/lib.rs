//! The data model of RDF Sage.
//!
//! RDF terms are taken from Oxigraph's `oxrdf` crate and re-exported here. On top of them, this
//! crate defines the vocabulary of the preemptable query engine: [TriplePattern]s with their
//! [PatternShape], [SolutionMapping]s, and the [TypedValue]s used while evaluating filters.

mod error;
mod mapping;
mod pattern;
pub mod serde_term;
mod shape;
mod triple;
mod typed_value;

pub use error::*;
pub use mapping::SolutionMapping;
pub use pattern::{BasicGraphPattern, PatternTerm, TriplePattern, TriplePosition};
pub use shape::PatternShape;
pub use triple::TermTriple;
pub use typed_value::{Numeric, TypedValue};

// Re-export some oxrdf types.
pub use oxrdf::vocab;
pub use oxrdf::{
    BlankNode, BlankNodeIdParseError, GraphName, IriParseError, Literal, NamedNode, Quad, Term,
    TermParseError, Variable, VariableNameParseError,
};
