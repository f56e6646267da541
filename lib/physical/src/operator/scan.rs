use crate::snapshot::SavedScan;
use crate::{ExecutionContext, Step};
use rdf_sage_model::{SolutionMapping, TermTriple, TriplePattern, TriplePosition};
use rdf_sage_storage::{PatternScan, StorageError, TripleCursor};
use std::fmt::{Debug, Formatter};

/// Turns the triples matching a [TriplePattern] into solutions.
///
/// The scan remembers the offset it was opened at and counts the triples it has read. Their sum is
/// the position at which the pattern source must be searched again to resume the scan.
pub struct ScanOperator {
    pattern: TriplePattern,
    cursor: Box<dyn TripleCursor>,
    cardinality: u64,
    offset: u64,
    reads: u64,
}

impl ScanOperator {
    /// Creates a new [ScanOperator] from a `scan` that was opened at `offset`.
    pub fn new(pattern: TriplePattern, scan: PatternScan, offset: u64) -> Self {
        Self {
            pattern,
            cursor: scan.cursor,
            cardinality: scan.cardinality,
            offset,
            reads: 0,
        }
    }

    /// Searches `pattern` in the pattern source of `context`, starting at `offset`.
    pub fn open(
        context: &ExecutionContext,
        pattern: TriplePattern,
        offset: u64,
    ) -> Result<Self, StorageError> {
        let scan = context.search(&pattern, offset)?;
        Ok(Self::new(pattern, scan, offset))
    }

    /// Reopens a saved scan.
    ///
    /// The cardinality is taken from the snapshot such that the plan keeps the estimates it was
    /// built with.
    pub fn load(context: &ExecutionContext, saved: SavedScan) -> Result<Self, StorageError> {
        let mut scan = Self::open(context, saved.pattern, saved.offset)?;
        scan.cardinality = saved.cardinality;
        Ok(scan)
    }

    pub fn pattern(&self) -> &TriplePattern {
        &self.pattern
    }

    pub fn cardinality(&self) -> u64 {
        self.cardinality
    }

    /// The absolute position of the next triple in the pattern source.
    pub fn position(&self) -> u64 {
        self.offset + self.reads
    }

    pub fn has_next(&self) -> bool {
        self.cursor.has_next()
    }

    /// Reads the next triple.
    ///
    /// If a variable occurs more than once in the pattern and the triple binds it to different
    /// terms, the triple is consumed without producing a solution.
    pub fn next(&mut self) -> Result<Step, StorageError> {
        let Some(triple) = self.cursor.next_triple()? else {
            return Ok(Step::Exhausted);
        };
        self.reads += 1;

        Ok(match bind_triple(&self.pattern, triple) {
            Some(solution) => Step::Solution(solution),
            None => Step::NotYet,
        })
    }

    pub fn save(&self) -> SavedScan {
        SavedScan {
            pattern: self.pattern.clone(),
            cardinality: self.cardinality,
            offset: self.position(),
        }
    }
}

/// Projects the triple onto the variables of `pattern`.
fn bind_triple(pattern: &TriplePattern, triple: TermTriple) -> Option<SolutionMapping> {
    let mut solution = SolutionMapping::new();
    for position in TriplePosition::ALL {
        let Some(variable) = pattern.get(position).as_variable() else {
            continue;
        };

        let term = triple.get(position);
        match solution.get(variable) {
            Some(existing) if existing != term => return None,
            Some(_) => {}
            None => {
                solution.insert(variable.clone(), term.clone());
            }
        }
    }
    Some(solution)
}

impl Debug for ScanOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanOperator")
            .field("pattern", &self.pattern)
            .field("cardinality", &self.cardinality)
            .field("offset", &self.offset)
            .field("reads", &self.reads)
            .finish_non_exhaustive()
    }
}
