use std::fmt::{Display, Formatter};

/// The id of the default graph. No term is ever mapped to this id.
pub(crate) const DEFAULT_GRAPH_ID: ObjectId = ObjectId(0);

/// Identifies an RDF term within a [MemObjectIdMapping](super::MemObjectIdMapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    pub(crate) const MIN: ObjectId = ObjectId(u32::MIN);
    pub(crate) const MAX: ObjectId = ObjectId(u32::MAX);
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
