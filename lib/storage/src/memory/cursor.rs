use crate::memory::triple_index::IdTriple;
use crate::memory::MemObjectIdMapping;
use crate::{StorageError, TripleCursor};
use rdf_sage_model::TermTriple;
use std::sync::Arc;

/// Decodes the id triples collected by a scan into terms, one triple per call.
pub(crate) struct MemTripleCursor {
    mapping: Arc<MemObjectIdMapping>,
    triples: std::vec::IntoIter<IdTriple>,
}

impl MemTripleCursor {
    pub fn new(mapping: Arc<MemObjectIdMapping>, triples: Vec<IdTriple>) -> Self {
        Self {
            mapping,
            triples: triples.into_iter(),
        }
    }
}

impl TripleCursor for MemTripleCursor {
    fn has_next(&self) -> bool {
        self.triples.len() > 0
    }

    fn next_triple(&mut self) -> Result<Option<TermTriple>, StorageError> {
        let Some([subject, predicate, object]) = self.triples.next() else {
            return Ok(None);
        };
        Ok(Some(TermTriple::new(
            self.mapping.decode_term(subject)?,
            self.mapping.decode_term(predicate)?,
            self.mapping.decode_term(object)?,
        )))
    }
}
