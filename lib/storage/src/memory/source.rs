use crate::memory::cursor::MemTripleCursor;
use crate::memory::object_id::ObjectId;
use crate::memory::triple_index::MemTripleIndex;
use crate::memory::MemObjectIdMapping;
use crate::{PatternScan, PatternSource, StorageError};
use oxrdfio::{RdfParseError, RdfParser};
use rdf_sage_model::{GraphName, Quad, Term, TriplePattern, TriplePosition};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::io::Read;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A [PatternSource] that holds an RDF dataset in memory.
///
/// Every graph of the dataset is indexed in the orderings SPO, POS, and OSP, such that every
/// pattern shape is answered by a single range scan. Matches are returned in the order of the
/// index, which makes offsets stable between searches as long as the dataset is not modified.
#[derive(Default)]
pub struct MemPatternSource {
    mapping: Arc<MemObjectIdMapping>,
    graphs: RwLock<BTreeMap<ObjectId, MemTripleIndex>>,
}

impl MemPatternSource {
    /// Creates a new empty [MemPatternSource].
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a single quad. Returns `true` if the quad was not already present.
    pub fn insert(&self, quad: &Quad) -> Result<bool, StorageError> {
        let graph = self.mapping.encode_graph_name_intern(&quad.graph_name);
        let triple = self.encode_triple(quad);
        Ok(self.write()?.entry(graph).or_default().insert(triple))
    }

    /// Inserts all `quads`. Returns the number of newly inserted quads.
    pub fn extend(&self, quads: impl IntoIterator<Item = Quad>) -> Result<usize, StorageError> {
        let mut graphs = self.write()?;
        let mut inserted = 0;
        for quad in quads {
            let graph = self.mapping.encode_graph_name_intern(&quad.graph_name);
            let triple = self.encode_triple(&quad);
            if graphs.entry(graph).or_default().insert(triple) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Parses the content of `reader` and inserts all quads.
    ///
    /// If `lenient` is set, syntax errors are logged and the invalid statements are skipped.
    /// Otherwise, the first syntax error aborts the load and nothing is inserted.
    pub fn load(
        &self,
        parser: impl Into<RdfParser>,
        reader: impl Read,
        lenient: bool,
    ) -> Result<usize, StorageError> {
        let mut quads = Vec::new();
        for result in parser.into().rename_blank_nodes().for_reader(reader) {
            match result {
                Ok(quad) => quads.push(quad),
                Err(RdfParseError::Syntax(error)) if lenient => {
                    tracing::warn!(%error, "Skipping invalid RDF statement.");
                }
                Err(error) => return Err(error.into()),
            }
        }

        let parsed = quads.len();
        let inserted = self.extend(quads)?;
        tracing::debug!(parsed, inserted, "Loaded RDF data into memory.");
        Ok(inserted)
    }

    /// Returns the number of quads in the dataset.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.values().map(MemTripleIndex::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Returns `true` if the dataset has at least one triple in `graph_name`. The default graph
    /// always exists.
    pub fn contains_graph(&self, graph_name: &GraphName) -> Result<bool, StorageError> {
        if graph_name.is_default_graph() {
            return Ok(true);
        }
        let Some(graph) = self.mapping.try_get_graph_object_id(graph_name) else {
            return Ok(false);
        };
        Ok(self.read()?.contains_key(&graph))
    }

    /// Returns all named graphs of the dataset.
    pub fn named_graphs(&self) -> Result<Vec<GraphName>, StorageError> {
        self.read()?
            .keys()
            .map(|graph| self.mapping.decode_graph_name(*graph))
            .filter(|graph| !matches!(graph, Ok(GraphName::DefaultGraph)))
            .collect()
    }

    fn encode_triple(&self, quad: &Quad) -> [ObjectId; 3] {
        [
            self.mapping
                .encode_term_intern(&Term::from(quad.subject.clone())),
            self.mapping
                .encode_term_intern(&Term::from(quad.predicate.clone())),
            self.mapping.encode_term_intern(&quad.object),
        ]
    }

    /// Resolves the bound positions of `pattern` to object ids.
    ///
    /// Returns [None] if a bound term is unknown, i.e., the pattern cannot match anything.
    fn encode_pattern(&self, pattern: &TriplePattern) -> Option<[Option<ObjectId>; 3]> {
        let mut encoded = [None; 3];
        for (i, position) in TriplePosition::ALL.into_iter().enumerate() {
            if let Some(term) = pattern.get(position).as_term() {
                encoded[i] = Some(self.mapping.try_get_object_id(term)?);
            }
        }
        Some(encoded)
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, BTreeMap<ObjectId, MemTripleIndex>>, StorageError> {
        self.graphs
            .read()
            .map_err(|_| StorageError::Unavailable(String::from("The dataset lock is poisoned.")))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<ObjectId, MemTripleIndex>>, StorageError> {
        self.graphs
            .write()
            .map_err(|_| StorageError::Unavailable(String::from("The dataset lock is poisoned.")))
    }
}

impl PatternSource for MemPatternSource {
    fn search(&self, pattern: &TriplePattern, offset: u64) -> Result<PatternScan, StorageError> {
        let Some(graph) = self.mapping.try_get_graph_object_id(&pattern.graph) else {
            return Ok(PatternScan::empty());
        };
        let Some(encoded) = self.encode_pattern(pattern) else {
            return Ok(PatternScan::empty());
        };

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let graphs = self.read()?;
        let Some(index) = graphs.get(&graph) else {
            return Ok(PatternScan::empty());
        };

        let (cardinality, triples) = index.scan(encoded, offset);
        let cursor = MemTripleCursor::new(Arc::clone(&self.mapping), triples);
        Ok(PatternScan::new(cursor, cardinality as u64))
    }
}

impl Debug for MemPatternSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemPatternSource")
            .field("terms", &self.mapping.len())
            .field("quads", &self.len().ok())
            .finish()
    }
}
