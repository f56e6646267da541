use crate::expression::Expression;
use crate::snapshot::SavedFilter;
use crate::{ExecutionContext, ExecutionError, PreemptableOperator, Step};

/// Discards the solutions of its source that do not satisfy an [Expression].
#[derive(Debug)]
pub struct FilterOperator {
    source: Box<PreemptableOperator>,
    expression: Expression,
}

impl FilterOperator {
    pub fn new(source: PreemptableOperator, expression: Expression) -> Self {
        Self {
            source: Box::new(source),
            expression,
        }
    }

    pub fn source(&self) -> &PreemptableOperator {
        &self.source
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn has_next(&self) -> bool {
        self.source.has_next()
    }

    /// Pulls from the source until a solution satisfies the expression.
    ///
    /// Stops early if the source is not ready, such that the scheduler regains control.
    pub fn next(&mut self, context: &ExecutionContext) -> Result<Step, ExecutionError> {
        loop {
            match self.source.next(context)? {
                Step::Solution(solution) if self.expression.is_satisfied_by(&solution) => {
                    return Ok(Step::Solution(solution));
                }
                Step::Solution(_) => {}
                step => return Ok(step),
            }
        }
    }

    pub fn save(&self) -> SavedFilter {
        SavedFilter {
            source: Box::new(self.source.save()),
            expression: self.expression.clone(),
        }
    }
}
