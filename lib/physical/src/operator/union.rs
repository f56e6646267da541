use crate::snapshot::SavedBagUnion;
use crate::{ExecutionContext, ExecutionError, PreemptableOperator, Step};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Decides which child of a [BagUnionOperator] is polled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnionMode {
    /// Drains the left child before the right child.
    #[default]
    Ordered,
    /// Flips a coin for every step. Falls back to the other child if the chosen one is exhausted.
    Randomized,
}

impl Display for UnionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UnionMode::Ordered => "ordered",
            UnionMode::Randomized => "randomized",
        })
    }
}

/// The bag union of two operators. Duplicates are preserved.
#[derive(Debug)]
pub struct BagUnionOperator {
    left: Box<PreemptableOperator>,
    right: Box<PreemptableOperator>,
    mode: UnionMode,
}

impl BagUnionOperator {
    pub fn new(left: PreemptableOperator, right: PreemptableOperator, mode: UnionMode) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
            mode,
        }
    }

    pub fn left(&self) -> &PreemptableOperator {
        &self.left
    }

    pub fn right(&self) -> &PreemptableOperator {
        &self.right
    }

    pub fn mode(&self) -> UnionMode {
        self.mode
    }

    pub fn has_next(&self) -> bool {
        self.left.has_next() || self.right.has_next()
    }

    pub fn next(&mut self, context: &ExecutionContext) -> Result<Step, ExecutionError> {
        let left_first = match self.mode {
            UnionMode::Ordered => true,
            UnionMode::Randomized => rand::random::<bool>(),
        };
        let (first, second) = if left_first {
            (&mut self.left, &mut self.right)
        } else {
            (&mut self.right, &mut self.left)
        };

        let child = if first.has_next() {
            first
        } else if second.has_next() {
            second
        } else {
            return Ok(Step::Exhausted);
        };

        match child.next(context)? {
            // The polled child turned out to be exhausted but the other one still has data.
            Step::Exhausted if self.has_next() => Ok(Step::NotYet),
            step => Ok(step),
        }
    }

    pub fn save(&self) -> SavedBagUnion {
        SavedBagUnion {
            left: Box::new(self.left.save()),
            right: Box::new(self.right.save()),
            mode: self.mode,
        }
    }
}
