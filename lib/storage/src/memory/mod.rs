//! An in-memory [PatternSource](crate::PatternSource).
//!
//! Terms are mapped to 32-bit object ids by the [MemObjectIdMapping]. Each graph then stores its
//! triples as id triples in three sorted indexes (see [crate::index]).

mod cursor;
mod object_id;
mod object_id_mapping;
mod source;
mod triple_index;

pub use object_id::ObjectId;
pub use object_id_mapping::MemObjectIdMapping;
pub use source::MemPatternSource;
