//! The expressions used in FILTER operators.
//!
//! An [Expression] is a small tree that is evaluated against a single [SolutionMapping](rdf_sage_model::SolutionMapping)
//! by a tree-walking interpreter (see [Expression::evaluate]). Expressions are part of the
//! snapshot of a filter and therefore serializable.

mod evaluate;

use itertools::Itertools;
use rdf_sage_model::serde_term;
use rdf_sage_model::{Term, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// A FILTER expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    /// A constant RDF term.
    Constant(#[serde(with = "serde_term::term")] Term),
    /// The value bound to a variable. Evaluating an unbound variable is an error.
    Variable(#[serde(with = "serde_term::variable")] Variable),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `needle IN (haystack)` or, if negated, `needle NOT IN (haystack)`.
    In {
        needle: Box<Expression>,
        haystack: Vec<Expression>,
        negated: bool,
    },
    /// [BOUND](https://www.w3.org/TR/sparql11-query/#func-bound)
    Bound(#[serde(with = "serde_term::variable")] Variable),
    /// A call of a built-in function.
    Call {
        function: BuiltinFunction,
        arguments: Vec<Expression>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Plus,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinFunction {
    SameTerm,
    IsIri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    Str,
    Lang,
    Datatype,
    Uuid,
    StrUuid,
}

impl Expression {
    pub fn variable(variable: Variable) -> Self {
        Expression::Variable(variable)
    }

    pub fn constant(term: impl Into<Term>) -> Self {
        Expression::Constant(term.into())
    }

    pub fn unary(operator: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(function: BuiltinFunction, arguments: Vec<Expression>) -> Self {
        Expression::Call {
            function,
            arguments,
        }
    }

    /// Returns all variables referenced by the expression.
    pub fn variables(&self) -> BTreeSet<Variable> {
        let mut variables = BTreeSet::new();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables(&self, variables: &mut BTreeSet<Variable>) {
        match self {
            Expression::Constant(_) => {}
            Expression::Variable(variable) | Expression::Bound(variable) => {
                variables.insert(variable.clone());
            }
            Expression::Unary { operand, .. } => operand.collect_variables(variables),
            Expression::Binary { left, right, .. } => {
                left.collect_variables(variables);
                right.collect_variables(variables);
            }
            Expression::In {
                needle, haystack, ..
            } => {
                needle.collect_variables(variables);
                for expression in haystack {
                    expression.collect_variables(variables);
                }
            }
            Expression::Call { arguments, .. } => {
                for expression in arguments {
                    expression.collect_variables(variables);
                }
            }
        }
    }

    /// Combines all `expressions` with `&&`. Returns [None] if there are no expressions.
    pub fn conjunction(expressions: impl IntoIterator<Item = Expression>) -> Option<Self> {
        expressions
            .into_iter()
            .reduce(|left, right| Expression::binary(BinaryOperator::And, left, right))
    }

    /// Splits the expression at its top-level `&&` operators.
    pub fn into_conjuncts(self) -> Vec<Expression> {
        let mut conjuncts = Vec::new();
        let mut pending = vec![self];
        while let Some(expression) = pending.pop() {
            match expression {
                Expression::Binary {
                    operator: BinaryOperator::And,
                    left,
                    right,
                } => {
                    pending.push(*right);
                    pending.push(*left);
                }
                other => conjuncts.push(other),
            }
        }
        conjuncts
    }
}

impl BinaryOperator {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessOrEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterOrEqual => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        }
    }
}

impl BuiltinFunction {
    /// The number of arguments the function expects.
    pub fn arity(self) -> usize {
        match self {
            BuiltinFunction::SameTerm => 2,
            BuiltinFunction::Uuid | BuiltinFunction::StrUuid => 0,
            _ => 1,
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
        })
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Display for BuiltinFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BuiltinFunction::SameTerm => "sameTerm",
            BuiltinFunction::IsIri => "isIRI",
            BuiltinFunction::IsBlank => "isBlank",
            BuiltinFunction::IsLiteral => "isLiteral",
            BuiltinFunction::IsNumeric => "isNumeric",
            BuiltinFunction::Str => "STR",
            BuiltinFunction::Lang => "LANG",
            BuiltinFunction::Datatype => "DATATYPE",
            BuiltinFunction::Uuid => "UUID",
            BuiltinFunction::StrUuid => "STRUUID",
        })
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Constant(term) => write!(f, "{term}"),
            Expression::Variable(variable) => write!(f, "{variable}"),
            Expression::Unary { operator, operand } => write!(f, "{operator}{operand}"),
            Expression::Binary {
                operator,
                left,
                right,
            } => write!(f, "({left} {operator} {right})"),
            Expression::In {
                needle,
                haystack,
                negated,
            } => {
                let operator = if *negated { "NOT IN" } else { "IN" };
                write!(f, "({needle} {operator} ({}))", haystack.iter().join(", "))
            }
            Expression::Bound(variable) => write!(f, "BOUND({variable})"),
            Expression::Call {
                function,
                arguments,
            } => write!(f, "{function}({})", arguments.iter().join(", ")),
        }
    }
}
