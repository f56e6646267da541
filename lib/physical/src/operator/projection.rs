use crate::snapshot::SavedProjection;
use crate::{ExecutionContext, ExecutionError, PreemptableOperator, Step};
use rdf_sage_model::Variable;

/// Restricts the solutions of its source to a list of variables.
///
/// Without a list, solutions are passed through unchanged.
#[derive(Debug)]
pub struct ProjectionOperator {
    source: Box<PreemptableOperator>,
    variables: Option<Vec<Variable>>,
}

impl ProjectionOperator {
    pub fn new(source: PreemptableOperator, variables: Option<Vec<Variable>>) -> Self {
        Self {
            source: Box::new(source),
            variables,
        }
    }

    pub fn source(&self) -> &PreemptableOperator {
        &self.source
    }

    pub fn variables(&self) -> Option<&[Variable]> {
        self.variables.as_deref()
    }

    pub fn has_next(&self) -> bool {
        self.source.has_next()
    }

    pub fn next(&mut self, context: &ExecutionContext) -> Result<Step, ExecutionError> {
        Ok(match (self.source.next(context)?, &self.variables) {
            (Step::Solution(solution), Some(variables)) => {
                Step::Solution(solution.project(variables))
            }
            (step, _) => step,
        })
    }

    pub fn save(&self) -> SavedProjection {
        SavedProjection {
            source: Box::new(self.source.save()),
            variables: self.variables.clone(),
        }
    }
}
