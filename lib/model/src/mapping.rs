use crate::PatternParseError;
use oxrdf::{Term, Variable};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A solution mapping assigns RDF terms to variables.
///
/// Keys are unique and the mapping has no ordering semantics. Internally, a [BTreeMap] is used so
/// that iteration (and therefore serialization) is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(String, String)>", into = "Vec<(String, String)>")]
pub struct SolutionMapping {
    bindings: BTreeMap<Variable, Term>,
}

impl SolutionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.bindings.get(variable)
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Binds `variable` to `term`, returning the previous value.
    pub fn insert(&mut self, variable: Variable, term: Term) -> Option<Term> {
        self.bindings.insert(variable, term)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Variable, Term> {
        self.bindings.iter()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.bindings.keys()
    }

    /// Merges `other` into this mapping by key union.
    ///
    /// The operators only merge compatible mappings, so a key present in both mappings is bound to
    /// the same term and the value from `other` is kept.
    #[must_use]
    pub fn merge(mut self, other: SolutionMapping) -> SolutionMapping {
        self.bindings.extend(other.bindings);
        self
    }

    /// Restricts the mapping to the given variables. Requested variables that are not bound are
    /// simply absent from the result.
    #[must_use]
    pub fn project(mut self, variables: &[Variable]) -> SolutionMapping {
        self.bindings.retain(|variable, _| variables.contains(variable));
        self
    }
}

impl FromIterator<(Variable, Term)> for SolutionMapping {
    fn from_iter<T: IntoIterator<Item = (Variable, Term)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SolutionMapping {
    type Item = (Variable, Term);
    type IntoIter = btree_map::IntoIter<Variable, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.into_iter()
    }
}

impl<'a> IntoIterator for &'a SolutionMapping {
    type Item = (&'a Variable, &'a Term);
    type IntoIter = btree_map::Iter<'a, Variable, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

impl Display for SolutionMapping {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (variable, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{variable}={term}")?;
        }
        f.write_str("}")
    }
}

impl From<SolutionMapping> for Vec<(String, String)> {
    fn from(value: SolutionMapping) -> Self {
        value
            .bindings
            .into_iter()
            .map(|(variable, term)| (variable.into_string(), term.to_string()))
            .collect()
    }
}

impl TryFrom<Vec<(String, String)>> for SolutionMapping {
    type Error = PatternParseError;

    fn try_from(value: Vec<(String, String)>) -> Result<Self, Self::Error> {
        value
            .into_iter()
            .map(|(variable, term)| Ok((Variable::new(variable)?, Term::from_str(&term)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode};

    fn mapping(entries: &[(&str, &str)]) -> SolutionMapping {
        entries
            .iter()
            .map(|(variable, iri)| {
                (
                    Variable::new_unchecked(*variable),
                    Term::from(NamedNode::new_unchecked(*iri)),
                )
            })
            .collect()
    }

    #[test]
    fn merge_is_key_union() {
        let left = mapping(&[("s", "http://ex.org/a")]);
        let right = mapping(&[("o", "http://ex.org/b")]);

        let merged = left.merge(right);

        assert_eq!(merged.len(), 2);
        insta::assert_snapshot!(merged, @"{?o=<http://ex.org/b>, ?s=<http://ex.org/a>}");
    }

    #[test]
    fn project_ignores_missing_variables() {
        let solution = mapping(&[("s", "http://ex.org/a"), ("o", "http://ex.org/b")]);

        let projected = solution.project(&[
            Variable::new_unchecked("s"),
            Variable::new_unchecked("missing"),
        ]);

        assert_eq!(projected, mapping(&[("s", "http://ex.org/a")]));
    }

    #[test]
    fn serde_round_trip() {
        let mut solution = mapping(&[("s", "http://ex.org/a")]);
        solution.insert(
            Variable::new_unchecked("label"),
            Literal::new_language_tagged_literal_unchecked("hello", "en").into(),
        );

        let bytes = postcard::to_allocvec(&solution).unwrap();
        let decoded: SolutionMapping = postcard::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, solution);
    }
}
