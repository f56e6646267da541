use crate::memory::object_id::{DEFAULT_GRAPH_ID, ObjectId};
use crate::StorageError;
use dashmap::DashMap;
use rdf_sage_model::{GraphName, Term};
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicU32, Ordering};

/// Maintains a mapping between RDF terms and object IDs in memory.
///
/// # Object IDs
///
/// The Object ID is a 32-bit unsigned integer used to uniquely identify RDF terms. Currently, we
/// simply use a counter to allocate new object IDs. The id `0` is reserved for the default graph.
#[derive(Debug)]
pub struct MemObjectIdMapping {
    /// Contains the next free object id.
    next_id: AtomicU32,
    /// Maps object ids to the terms.
    id2term: DashMap<ObjectId, Term, BuildHasherDefault<FxHasher>>,
    /// Maps terms to their object id.
    term2id: DashMap<Term, ObjectId, BuildHasherDefault<FxHasher>>,
}

impl Default for MemObjectIdMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl MemObjectIdMapping {
    /// Creates a new empty [MemObjectIdMapping].
    pub fn new() -> Self {
        Self {
            next_id: AtomicU32::new(1), // Start at 1 to account for Default Graph.
            id2term: DashMap::with_hasher(BuildHasherDefault::default()),
            term2id: DashMap::with_hasher(BuildHasherDefault::default()),
        }
    }

    /// Returns the number of mapped terms.
    pub fn len(&self) -> usize {
        self.term2id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term2id.is_empty()
    }

    /// Returns the object id of `term`, allocating a new one if the term is not yet known.
    pub fn encode_term_intern(&self, term: &Term) -> ObjectId {
        if let Some(id) = self.term2id.get(term) {
            return *id;
        }

        *self.term2id.entry(term.clone()).or_insert_with(|| {
            let id = ObjectId(self.next_id.fetch_add(1, Ordering::Relaxed));
            self.id2term.insert(id, term.clone());
            id
        })
    }

    pub fn encode_graph_name_intern(&self, graph_name: &GraphName) -> ObjectId {
        match graph_name {
            GraphName::NamedNode(node) => self.encode_term_intern(&node.clone().into()),
            GraphName::BlankNode(node) => self.encode_term_intern(&node.clone().into()),
            GraphName::DefaultGraph => DEFAULT_GRAPH_ID,
        }
    }

    /// Returns the object id of `term` without allocating a new one.
    ///
    /// A term without an object id does not occur in any triple.
    pub fn try_get_object_id(&self, term: &Term) -> Option<ObjectId> {
        self.term2id.get(term).map(|id| *id)
    }

    pub fn try_get_graph_object_id(&self, graph_name: &GraphName) -> Option<ObjectId> {
        match graph_name {
            GraphName::NamedNode(node) => self.try_get_object_id(&node.clone().into()),
            GraphName::BlankNode(node) => self.try_get_object_id(&node.clone().into()),
            GraphName::DefaultGraph => Some(DEFAULT_GRAPH_ID),
        }
    }

    /// Decodes the given `object_id`.
    ///
    /// # Error
    ///
    /// Returns an error if the object id is unknown.
    pub fn decode_term(&self, object_id: ObjectId) -> Result<Term, StorageError> {
        self.id2term
            .get(&object_id)
            .map(|term| term.clone())
            .ok_or_else(|| StorageError::Unavailable(format!("Unknown object id {object_id}.")))
    }

    /// Decodes the given `object_id` as a graph name.
    pub fn decode_graph_name(&self, object_id: ObjectId) -> Result<GraphName, StorageError> {
        if object_id == DEFAULT_GRAPH_ID {
            return Ok(GraphName::DefaultGraph);
        }

        match self.decode_term(object_id)? {
            Term::NamedNode(node) => Ok(GraphName::NamedNode(node)),
            Term::BlankNode(node) => Ok(GraphName::BlankNode(node)),
            term => Err(StorageError::Unavailable(format!(
                "{term} cannot be used as a graph name."
            ))),
        }
    }
}
