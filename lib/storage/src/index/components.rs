use rdf_sage_model::{PatternShape, TriplePosition};
use std::fmt::{Display, Formatter};

/// Represents a list of *disjunct* index components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexComponents([TriplePosition; 3]);

impl IndexComponents {
    /// An SPO index.
    pub const SPO: IndexComponents = IndexComponents([
        TriplePosition::Subject,
        TriplePosition::Predicate,
        TriplePosition::Object,
    ]);

    /// A POS index.
    pub const POS: IndexComponents = IndexComponents([
        TriplePosition::Predicate,
        TriplePosition::Object,
        TriplePosition::Subject,
    ]);

    /// An OSP index.
    pub const OSP: IndexComponents = IndexComponents([
        TriplePosition::Object,
        TriplePosition::Subject,
        TriplePosition::Predicate,
    ]);

    /// All indexes maintained for a graph.
    pub const ALL: [IndexComponents; 3] = [Self::SPO, Self::POS, Self::OSP];

    /// Selects the index whose ordering starts with all bound positions of `shape`.
    pub fn for_bound_positions(shape: PatternShape) -> IndexComponents {
        match shape {
            PatternShape::AllBound
            | PatternShape::SubjectPredicate
            | PatternShape::Subject
            | PatternShape::Unbound => Self::SPO,
            PatternShape::PredicateObject | PatternShape::Predicate => Self::POS,
            PatternShape::SubjectObject | PatternShape::Object => Self::OSP,
        }
    }

    /// Reorders an SPO triple into the ordering of this index.
    pub fn permute<T: Copy>(&self, spo: [T; 3]) -> [T; 3] {
        self.0.map(|position| spo[position_index(position)])
    }

    /// Reorders a triple in the ordering of this index back into SPO.
    pub fn unpermute<T: Copy>(&self, permuted: [T; 3]) -> [T; 3] {
        let mut spo = permuted;
        for (i, position) in self.0.iter().enumerate() {
            spo[position_index(*position)] = permuted[i];
        }
        spo
    }
}

fn position_index(position: TriplePosition) -> usize {
    match position {
        TriplePosition::Subject => 0,
        TriplePosition::Predicate => 1,
        TriplePosition::Object => 2,
    }
}

impl Display for IndexComponents {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for component in &self.0 {
            let name = match component {
                TriplePosition::Subject => "S",
                TriplePosition::Predicate => "P",
                TriplePosition::Object => "O",
            };
            f.write_str(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_positions_form_a_prefix() {
        for (s, p, o) in [
            (true, true, true),
            (true, false, true),
            (false, true, true),
            (true, true, false),
            (false, false, true),
            (true, false, false),
            (false, true, false),
            (false, false, false),
        ] {
            let shape = PatternShape::new(s, p, o);
            let index = IndexComponents::for_bound_positions(shape);
            let bound = index.permute([s, p, o]);
            let prefix = bound.iter().take_while(|b| **b).count();
            assert_eq!(prefix, shape.bound_count(), "{shape} using {index}");
        }
    }

    #[test]
    fn permutation_is_reversible() {
        for index in IndexComponents::ALL {
            assert_eq!(index.unpermute(index.permute([1, 2, 3])), [1, 2, 3]);
        }
        assert_eq!(IndexComponents::POS.permute([1, 2, 3]), [2, 3, 1]);
        assert_eq!(IndexComponents::OSP.to_string(), "OSP");
    }
}
