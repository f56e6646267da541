//! Serde helpers that store RDF terms in their N-Triples form.
//!
//! Oxigraph's data model does not implement serde. Snapshots must nevertheless carry terms, so the
//! helpers in this module are used with `#[serde(with = "...")]`.

use oxrdf::{GraphName, Term, Variable};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Stores a [Term] as an N-Triples string.
pub mod term {
    use super::*;

    pub fn serialize<S: Serializer>(term: &Term, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&term.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Term, D::Error> {
        let value = String::deserialize(deserializer)?;
        Term::from_str(&value).map_err(D::Error::custom)
    }
}

/// Stores a [Variable] by its name (without the leading `?`).
pub mod variable {
    use super::*;

    pub fn serialize<S: Serializer>(variable: &Variable, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(variable.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Variable, D::Error> {
        let value = String::deserialize(deserializer)?;
        Variable::new(value).map_err(D::Error::custom)
    }
}

/// Stores an optional list of [Variable]s by their names.
pub mod variable_list {
    use super::*;

    pub fn serialize<S: Serializer>(
        variables: &Option<Vec<Variable>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        variables
            .as_ref()
            .map(|variables| variables.iter().map(Variable::as_str).collect::<Vec<_>>())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<Variable>>, D::Error> {
        let names = Option::<Vec<String>>::deserialize(deserializer)?;
        names
            .map(|names| {
                names
                    .into_iter()
                    .map(|name| Variable::new(name).map_err(D::Error::custom))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
    }
}

/// Stores a [GraphName] as `None` (default graph) or the N-Triples form of the name.
pub mod graph_name {
    use super::*;
    use crate::PatternParseError;

    pub fn serialize<S: Serializer>(graph: &GraphName, serializer: S) -> Result<S::Ok, S::Error> {
        let name = match graph {
            GraphName::DefaultGraph => None,
            named => Some(named.to_string()),
        };
        name.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GraphName, D::Error> {
        let Some(name) = Option::<String>::deserialize(deserializer)? else {
            return Ok(GraphName::DefaultGraph);
        };
        match Term::from_str(&name).map_err(D::Error::custom)? {
            Term::NamedNode(node) => Ok(GraphName::NamedNode(node)),
            Term::BlankNode(node) => Ok(GraphName::BlankNode(node)),
            _ => Err(D::Error::custom(PatternParseError::InvalidGraphName(name))),
        }
    }
}
