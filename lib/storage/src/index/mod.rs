//! Contains the triple orderings used by the indexes of the in-memory pattern source.
//!
//! An index stores every triple of a graph in a particular ordering of the components subject,
//! predicate, and object. For example, the [IndexComponents::SPO] index sorts by subject first,
//! while [IndexComponents::POS] has the predicate as the first component. If all bound positions of
//! a pattern form a prefix of an index's ordering, the pattern can be answered with a single range
//! scan over that index. [IndexComponents::for_bound_positions] selects such an index for every
//! pattern shape.

mod components;

pub use components::*;
