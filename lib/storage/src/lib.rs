//! Contains the pattern source abstraction of [RDF Sage](https://docs.rs/rdf-sage/) and an
//! in-memory implementation of it.
//!
//! The query engine never talks to a storage backend directly. Instead, every backend is reduced to
//! a single capability: evaluating a triple pattern starting at a given offset ([PatternSource]).
//! As long as the order of the results is stable for a fixed state of the backend, an offset is
//! enough to resume a suspended scan.

mod error;
pub(crate) mod index;
pub mod memory;
mod source;

pub use error::*;
pub use memory::MemPatternSource;
pub use source::*;
