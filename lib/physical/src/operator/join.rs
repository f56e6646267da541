use crate::operator::scan::ScanOperator;
use crate::snapshot::{SavedBindJoin, SavedNestedLoopJoin};
use crate::{ExecutionContext, ExecutionError, PreemptableOperator, Step};
use rdf_sage_model::{SolutionMapping, TriplePattern};
use rdf_sage_storage::StorageError;
use std::collections::VecDeque;

/// Joins an outer stream of solutions with a triple pattern.
///
/// For each outer solution, the inner pattern is bound with the solution and scanned. Every inner
/// solution is merged with the outer solution. Once the inner scan is exhausted, the operator
/// returns [Step::NotYet] and pulls the next outer solution in the following step.
#[derive(Debug)]
pub struct NestedLoopJoinOperator {
    source: Box<PreemptableOperator>,
    inner: InnerLoop,
}

impl NestedLoopJoinOperator {
    pub fn new(source: PreemptableOperator, inner_pattern: TriplePattern) -> Self {
        Self {
            source: Box::new(source),
            inner: InnerLoop::new(inner_pattern),
        }
    }

    /// Restores a join that was suspended while scanning the inner pattern for `binding`.
    ///
    /// The inner scan is reopened at `offset` instead of pulling a new outer solution.
    pub fn resume(
        context: &ExecutionContext,
        source: PreemptableOperator,
        inner_pattern: TriplePattern,
        binding: Option<SolutionMapping>,
        offset: u64,
    ) -> Result<Self, StorageError> {
        let mut join = Self::new(source, inner_pattern);
        if let Some(binding) = binding {
            join.inner.open(context, binding, offset)?;
        }
        Ok(join)
    }

    pub fn source(&self) -> &PreemptableOperator {
        &self.source
    }

    pub fn inner_pattern(&self) -> &TriplePattern {
        &self.inner.pattern
    }

    pub fn has_next(&self) -> bool {
        self.source.has_next() || self.inner.has_next()
    }

    pub fn next(&mut self, context: &ExecutionContext) -> Result<Step, ExecutionError> {
        if !self.inner.is_open() {
            match self.source.next(context)? {
                Step::Solution(binding) => self.inner.open(context, binding, 0)?,
                step => return Ok(step),
            }
        }
        Ok(self.inner.next()?)
    }

    pub fn save(&self) -> SavedNestedLoopJoin {
        let (binding, offset) = self.inner.save();
        SavedNestedLoopJoin {
            source: Box::new(self.source.save()),
            inner: self.inner.pattern.clone(),
            binding,
            offset,
        }
    }
}

/// A variant of the [NestedLoopJoinOperator] whose outer solutions are known up front.
///
/// It follows the same exhaust/advance logic but takes the next outer solution from a list
/// instead of a child operator.
#[derive(Debug)]
pub struct BindJoinOperator {
    bindings: VecDeque<SolutionMapping>,
    inner: InnerLoop,
}

impl BindJoinOperator {
    pub fn new(
        bindings: impl IntoIterator<Item = SolutionMapping>,
        inner_pattern: TriplePattern,
    ) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
            inner: InnerLoop::new(inner_pattern),
        }
    }

    /// Restores a join that was suspended while scanning the inner pattern for `binding`.
    pub fn resume(
        context: &ExecutionContext,
        bindings: Vec<SolutionMapping>,
        inner_pattern: TriplePattern,
        binding: Option<SolutionMapping>,
        offset: u64,
    ) -> Result<Self, StorageError> {
        let mut join = Self::new(bindings, inner_pattern);
        if let Some(binding) = binding {
            join.inner.open(context, binding, offset)?;
        }
        Ok(join)
    }

    /// The number of outer solutions that have not been joined yet.
    pub fn pending_bindings(&self) -> usize {
        self.bindings.len()
    }

    pub fn inner_pattern(&self) -> &TriplePattern {
        &self.inner.pattern
    }

    pub fn has_next(&self) -> bool {
        !self.bindings.is_empty() || self.inner.has_next()
    }

    pub fn next(&mut self, context: &ExecutionContext) -> Result<Step, ExecutionError> {
        if !self.inner.is_open() {
            let Some(binding) = self.bindings.pop_front() else {
                return Ok(Step::Exhausted);
            };
            self.inner.open(context, binding, 0)?;
        }
        Ok(self.inner.next()?)
    }

    pub fn save(&self) -> SavedBindJoin {
        let (binding, offset) = self.inner.save();
        SavedBindJoin {
            bindings: self.bindings.iter().cloned().collect(),
            inner: self.inner.pattern.clone(),
            binding,
            offset,
        }
    }
}

/// The inner side of a join: a pattern and, while an outer solution is being joined, the scan
/// over the pattern bound with that solution.
#[derive(Debug)]
struct InnerLoop {
    pattern: TriplePattern,
    current: Option<BoundScan>,
}

#[derive(Debug)]
struct BoundScan {
    binding: SolutionMapping,
    scan: ScanOperator,
}

impl InnerLoop {
    fn new(pattern: TriplePattern) -> Self {
        Self {
            pattern,
            current: None,
        }
    }

    fn is_open(&self) -> bool {
        self.current.is_some()
    }

    fn has_next(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.scan.has_next())
    }

    fn open(
        &mut self,
        context: &ExecutionContext,
        binding: SolutionMapping,
        offset: u64,
    ) -> Result<(), StorageError> {
        let scan = ScanOperator::open(context, self.pattern.bind(&binding), offset)?;
        self.current = Some(BoundScan { binding, scan });
        Ok(())
    }

    fn next(&mut self) -> Result<Step, StorageError> {
        let Some(current) = &mut self.current else {
            return Ok(Step::NotYet);
        };

        match current.scan.next()? {
            Step::Solution(solution) => Ok(Step::Solution(current.binding.clone().merge(solution))),
            Step::NotYet => Ok(Step::NotYet),
            Step::Exhausted => {
                self.current = None;
                Ok(Step::NotYet)
            }
        }
    }

    /// Returns the outer solution that is currently joined and the position of the inner scan.
    fn save(&self) -> (Option<SolutionMapping>, u64) {
        match &self.current {
            Some(current) => (Some(current.binding.clone()), current.scan.position()),
            None => (None, 0),
        }
    }
}
