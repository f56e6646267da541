use crate::index::IndexComponents;
use crate::memory::object_id::ObjectId;
use rdf_sage_model::PatternShape;
use std::collections::BTreeSet;

/// An id triple in SPO order.
pub(crate) type IdTriple = [ObjectId; 3];

/// Holds the triples of a single graph, sorted in every ordering of [IndexComponents::ALL].
#[derive(Debug, Default)]
pub(crate) struct MemTripleIndex {
    spo: BTreeSet<IdTriple>,
    pos: BTreeSet<IdTriple>,
    osp: BTreeSet<IdTriple>,
}

impl MemTripleIndex {
    pub fn len(&self) -> usize {
        self.spo.len()
    }

    /// Inserts an SPO triple into all indexes. Returns `false` if the triple was already present.
    pub fn insert(&mut self, triple: IdTriple) -> bool {
        if !self.spo.insert(triple) {
            return false;
        }
        self.pos.insert(IndexComponents::POS.permute(triple));
        self.osp.insert(IndexComponents::OSP.permute(triple));
        true
    }

    /// Scans the triples matching the bound positions in `pattern`, skipping the first `offset`
    /// matches.
    ///
    /// Returns the total number of matches (ignoring the offset) and the remaining matches in SPO
    /// order. The order of the matches is the order of the selected index and therefore stable
    /// as long as the graph is not modified.
    pub fn scan(&self, pattern: [Option<ObjectId>; 3], offset: usize) -> (usize, Vec<IdTriple>) {
        let shape =
            PatternShape::new(pattern[0].is_some(), pattern[1].is_some(), pattern[2].is_some());
        let components = IndexComponents::for_bound_positions(shape);
        let index = self.index(components);

        let permuted = components.permute(pattern);
        let lower = permuted.map(|id| id.unwrap_or(ObjectId::MIN));
        let upper = permuted.map(|id| id.unwrap_or(ObjectId::MAX));

        let matches = index.range(lower..=upper);
        let cardinality = matches.clone().count();
        let triples = matches
            .skip(offset)
            .map(|triple| components.unpermute(*triple))
            .collect();
        (cardinality, triples)
    }

    fn index(&self, components: IndexComponents) -> &BTreeSet<IdTriple> {
        if components == IndexComponents::POS {
            &self.pos
        } else if components == IndexComponents::OSP {
            &self.osp
        } else {
            &self.spo
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u32) -> ObjectId {
        ObjectId(value)
    }

    fn example_index() -> MemTripleIndex {
        let mut index = MemTripleIndex::default();
        for (s, p, o) in [(1, 10, 100), (1, 11, 101), (2, 10, 100), (3, 10, 102)] {
            index.insert([id(s), id(p), id(o)]);
        }
        index
    }

    #[test]
    fn duplicate_insert_is_ignored() {
        let mut index = example_index();
        assert!(!index.insert([id(1), id(10), id(100)]));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn scan_by_predicate_object() {
        let index = example_index();

        let (cardinality, triples) = index.scan([None, Some(id(10)), Some(id(100))], 0);

        assert_eq!(cardinality, 2);
        assert_eq!(
            triples,
            vec![[id(1), id(10), id(100)], [id(2), id(10), id(100)]]
        );
    }

    #[test]
    fn scan_by_subject_object_uses_prefix() {
        let index = example_index();

        let (cardinality, triples) = index.scan([Some(id(1)), None, Some(id(101))], 0);

        assert_eq!(cardinality, 1);
        assert_eq!(triples, vec![[id(1), id(11), id(101)]]);
    }

    #[test]
    fn scan_with_offset_keeps_cardinality() {
        let index = example_index();

        let (cardinality, triples) = index.scan([None, None, None], 3);

        assert_eq!(cardinality, 4);
        assert_eq!(triples, vec![[id(3), id(10), id(102)]]);
    }
}
