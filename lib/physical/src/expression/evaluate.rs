use crate::expression::{BinaryOperator, BuiltinFunction, Expression, UnaryOperator};
use rdf_sage_model::{NamedNode, SolutionMapping, Term, ThinError, ThinResult, TypedValue};
use std::cmp::Ordering;

impl Expression {
    /// Returns `true` if the effective boolean value of the expression is `true`.
    ///
    /// Errors during the evaluation (e.g., an unbound variable or a type error) are treated as
    /// `false`.
    pub fn is_satisfied_by(&self, solution: &SolutionMapping) -> bool {
        self.effective_boolean_value(solution).unwrap_or(false)
    }

    /// Evaluates the expression and computes the
    /// [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv) of the result.
    pub fn effective_boolean_value(&self, solution: &SolutionMapping) -> ThinResult<bool> {
        self.evaluate(solution)?.effective_boolean_value()
    }

    /// Evaluates the expression against `solution`.
    pub fn evaluate(&self, solution: &SolutionMapping) -> ThinResult<TypedValue> {
        match self {
            Expression::Constant(term) => Ok(TypedValue::from_term(term)),
            Expression::Variable(variable) => solution
                .get(variable)
                .map(TypedValue::from_term)
                .ok_or(ThinError::default()),
            Expression::Unary { operator, operand } => evaluate_unary(*operator, operand, solution),
            Expression::Binary {
                operator,
                left,
                right,
            } => evaluate_binary(*operator, left, right, solution),
            Expression::In {
                needle,
                haystack,
                negated,
            } => {
                let contained = evaluate_in(needle, haystack, solution)?;
                Ok(TypedValue::BooleanLiteral(contained != *negated))
            }
            Expression::Bound(variable) => {
                Ok(TypedValue::BooleanLiteral(solution.contains(variable)))
            }
            Expression::Call {
                function,
                arguments,
            } => evaluate_call(*function, arguments, solution),
        }
    }

    /// Evaluates the expression to an RDF term.
    ///
    /// Constants and variables keep their lexical form, which matters for term equality.
    fn evaluate_term(&self, solution: &SolutionMapping) -> ThinResult<Term> {
        match self {
            Expression::Constant(term) => Ok(term.clone()),
            Expression::Variable(variable) => {
                solution.get(variable).cloned().ok_or(ThinError::default())
            }
            _ => Ok(self.evaluate(solution)?.into_term()),
        }
    }
}

fn evaluate_unary(
    operator: UnaryOperator,
    operand: &Expression,
    solution: &SolutionMapping,
) -> ThinResult<TypedValue> {
    match operator {
        UnaryOperator::Not => Ok(TypedValue::BooleanLiteral(
            !operand.effective_boolean_value(solution)?,
        )),
        UnaryOperator::Plus => match operand.evaluate(solution)? {
            TypedValue::NumericLiteral(value) => Ok(value.into()),
            _ => ThinError::expected(),
        },
        UnaryOperator::Minus => match operand.evaluate(solution)? {
            TypedValue::NumericLiteral(value) => Ok(value.checked_neg()?.into()),
            _ => ThinError::expected(),
        },
    }
}

fn evaluate_binary(
    operator: BinaryOperator,
    left: &Expression,
    right: &Expression,
    solution: &SolutionMapping,
) -> ThinResult<TypedValue> {
    let result = match operator {
        BinaryOperator::Or => {
            // An error on one side is masked if the other side is true.
            match (
                left.effective_boolean_value(solution),
                right.effective_boolean_value(solution),
            ) {
                (Ok(true), _) | (_, Ok(true)) => true,
                (Ok(false), Ok(false)) => false,
                _ => return ThinError::expected(),
            }
        }
        BinaryOperator::And => {
            // An error on one side is masked if the other side is false.
            match (
                left.effective_boolean_value(solution),
                right.effective_boolean_value(solution),
            ) {
                (Ok(false), _) | (_, Ok(false)) => false,
                (Ok(true), Ok(true)) => true,
                _ => return ThinError::expected(),
            }
        }
        BinaryOperator::Equal => left.evaluate(solution)?.sparql_eq(&right.evaluate(solution)?)?,
        BinaryOperator::NotEqual => {
            !left.evaluate(solution)?.sparql_eq(&right.evaluate(solution)?)?
        }
        BinaryOperator::Less => compare(left, right, solution)? == Ordering::Less,
        BinaryOperator::LessOrEqual => compare(left, right, solution)? != Ordering::Greater,
        BinaryOperator::Greater => compare(left, right, solution)? == Ordering::Greater,
        BinaryOperator::GreaterOrEqual => compare(left, right, solution)? != Ordering::Less,
        BinaryOperator::Add
        | BinaryOperator::Subtract
        | BinaryOperator::Multiply
        | BinaryOperator::Divide => return evaluate_arithmetic(operator, left, right, solution),
    };
    Ok(TypedValue::BooleanLiteral(result))
}

fn compare(
    left: &Expression,
    right: &Expression,
    solution: &SolutionMapping,
) -> ThinResult<Ordering> {
    left.evaluate(solution)?.sparql_cmp(&right.evaluate(solution)?)
}

fn evaluate_arithmetic(
    operator: BinaryOperator,
    left: &Expression,
    right: &Expression,
    solution: &SolutionMapping,
) -> ThinResult<TypedValue> {
    let (TypedValue::NumericLiteral(left), TypedValue::NumericLiteral(right)) =
        (left.evaluate(solution)?, right.evaluate(solution)?)
    else {
        return ThinError::expected();
    };

    let result = match operator {
        BinaryOperator::Add => left.checked_add(right)?,
        BinaryOperator::Subtract => left.checked_sub(right)?,
        BinaryOperator::Multiply => left.checked_mul(right)?,
        BinaryOperator::Divide => left.checked_div(right)?,
        _ => return ThinError::expected(),
    };
    Ok(result.into())
}

/// Implements [IN](https://www.w3.org/TR/sparql11-query/#func-in).
///
/// An error while comparing with one element of the haystack is only raised if no other element
/// is equal to the needle.
fn evaluate_in(
    needle: &Expression,
    haystack: &[Expression],
    solution: &SolutionMapping,
) -> ThinResult<bool> {
    let needle = needle.evaluate(solution)?;
    let mut error = false;
    for candidate in haystack {
        match candidate
            .evaluate(solution)
            .and_then(|candidate| needle.sparql_eq(&candidate))
        {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(_) => error = true,
        }
    }

    if error {
        ThinError::expected()
    } else {
        Ok(false)
    }
}

fn evaluate_call(
    function: BuiltinFunction,
    arguments: &[Expression],
    solution: &SolutionMapping,
) -> ThinResult<TypedValue> {
    if arguments.len() != function.arity() {
        return ThinError::expected();
    }

    Ok(match function {
        BuiltinFunction::SameTerm => TypedValue::BooleanLiteral(
            arguments[0].evaluate_term(solution)? == arguments[1].evaluate_term(solution)?,
        ),
        BuiltinFunction::IsIri => TypedValue::BooleanLiteral(matches!(
            arguments[0].evaluate(solution)?,
            TypedValue::NamedNode(_)
        )),
        BuiltinFunction::IsBlank => TypedValue::BooleanLiteral(matches!(
            arguments[0].evaluate(solution)?,
            TypedValue::BlankNode(_)
        )),
        BuiltinFunction::IsLiteral => {
            TypedValue::BooleanLiteral(arguments[0].evaluate(solution)?.is_literal())
        }
        BuiltinFunction::IsNumeric => TypedValue::BooleanLiteral(matches!(
            arguments[0].evaluate(solution)?,
            TypedValue::NumericLiteral(_)
        )),
        BuiltinFunction::Str => match arguments[0].evaluate_term(solution)? {
            Term::NamedNode(node) => TypedValue::SimpleLiteral(node.into_string()),
            Term::Literal(literal) => TypedValue::SimpleLiteral(literal.value().to_owned()),
            Term::BlankNode(_) => return ThinError::expected(),
        },
        BuiltinFunction::Lang => match arguments[0].evaluate(solution)? {
            TypedValue::LanguageStringLiteral { language, .. } => {
                TypedValue::SimpleLiteral(language)
            }
            value if value.is_literal() => TypedValue::SimpleLiteral(String::new()),
            _ => return ThinError::expected(),
        },
        BuiltinFunction::Datatype => {
            TypedValue::NamedNode(arguments[0].evaluate(solution)?.datatype()?)
        }
        BuiltinFunction::Uuid => TypedValue::NamedNode(NamedNode::new_unchecked(format!(
            "urn:uuid:{}",
            uuid::Uuid::new_v4()
        ))),
        BuiltinFunction::StrUuid => TypedValue::SimpleLiteral(uuid::Uuid::new_v4().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_sage_model::vocab::xsd;
    use rdf_sage_model::{Literal, Variable};

    fn var(name: &str) -> Expression {
        Expression::variable(Variable::new_unchecked(name))
    }

    fn int(value: i64) -> Expression {
        Expression::constant(Literal::from(value))
    }

    fn solution() -> SolutionMapping {
        [
            (Variable::new_unchecked("age"), Literal::from(42).into()),
            (
                Variable::new_unchecked("name"),
                Literal::new_language_tagged_literal_unchecked("Alice", "en").into(),
            ),
            (
                Variable::new_unchecked("s"),
                NamedNode::new_unchecked("http://ex.org/alice").into(),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn arithmetic_and_comparison() {
        let expression = Expression::binary(
            BinaryOperator::Equal,
            Expression::binary(BinaryOperator::Add, var("age"), int(8)),
            int(50),
        );
        assert!(expression.is_satisfied_by(&solution()));

        let expression = Expression::binary(
            BinaryOperator::LessOrEqual,
            Expression::binary(BinaryOperator::Divide, var("age"), int(4)),
            Expression::constant(Literal::new_typed_literal("10.5", xsd::DECIMAL)),
        );
        assert!(expression.is_satisfied_by(&solution()));
    }

    #[test]
    fn decimal_sum_is_exact() {
        let decimal =
            |value: &str| Expression::constant(Literal::new_typed_literal(value, xsd::DECIMAL));
        let expression = Expression::binary(
            BinaryOperator::Equal,
            Expression::binary(BinaryOperator::Add, decimal("0.1"), decimal("0.2")),
            decimal("0.3"),
        );
        assert!(expression.is_satisfied_by(&solution()));
    }

    #[test]
    fn type_errors_are_false() {
        let expression = Expression::binary(BinaryOperator::Less, var("name"), int(3));
        assert!(!expression.is_satisfied_by(&solution()));

        let negated = Expression::unary(UnaryOperator::Not, expression);
        assert!(!negated.is_satisfied_by(&solution()));
    }

    #[test]
    fn unbound_variable_is_error() {
        assert!(var("missing").evaluate(&solution()).is_err());
        let missing = Expression::Bound(Variable::new_unchecked("missing"));
        assert!(!missing.is_satisfied_by(&solution()));
        assert!(Expression::Bound(Variable::new_unchecked("age")).is_satisfied_by(&solution()));
    }

    #[test]
    fn logical_operators_mask_errors() {
        let error = var("missing");
        let truthy = int(1);
        let falsy = int(0);

        let or = Expression::binary(BinaryOperator::Or, error.clone(), truthy.clone());
        assert_eq!(or.effective_boolean_value(&solution()), Ok(true));

        let and = Expression::binary(BinaryOperator::And, error.clone(), falsy);
        assert_eq!(and.effective_boolean_value(&solution()), Ok(false));

        let and = Expression::binary(BinaryOperator::And, error, truthy);
        assert!(and.effective_boolean_value(&solution()).is_err());
    }

    #[test]
    fn in_and_not_in() {
        let haystack = vec![int(1), int(42), int(7)];
        let contained = Expression::In {
            needle: Box::new(var("age")),
            haystack: haystack.clone(),
            negated: false,
        };
        assert!(contained.is_satisfied_by(&solution()));

        let not_contained = Expression::In {
            needle: Box::new(var("age")),
            haystack,
            negated: true,
        };
        assert!(!not_contained.is_satisfied_by(&solution()));
    }

    #[test]
    fn accessors() {
        let lang = Expression::call(BuiltinFunction::Lang, vec![var("name")]);
        assert_eq!(
            lang.evaluate(&solution()),
            Ok(TypedValue::SimpleLiteral("en".to_owned()))
        );

        let datatype = Expression::call(BuiltinFunction::Datatype, vec![var("age")]);
        assert_eq!(
            datatype.evaluate(&solution()),
            Ok(TypedValue::NamedNode(xsd::INTEGER.into_owned()))
        );

        let str = Expression::call(BuiltinFunction::Str, vec![var("s")]);
        assert_eq!(
            str.evaluate(&solution()),
            Ok(TypedValue::SimpleLiteral("http://ex.org/alice".to_owned()))
        );
    }

    #[test]
    fn type_tests() {
        for (function, expected) in [
            (BuiltinFunction::IsIri, true),
            (BuiltinFunction::IsLiteral, false),
            (BuiltinFunction::IsBlank, false),
            (BuiltinFunction::IsNumeric, false),
        ] {
            let expression = Expression::call(function, vec![var("s")]);
            assert_eq!(expression.is_satisfied_by(&solution()), expected, "{function}");
        }
    }

    #[test]
    fn same_term_uses_lexical_form() {
        let same = Expression::call(
            BuiltinFunction::SameTerm,
            vec![
                Expression::constant(Literal::new_typed_literal("01", xsd::INTEGER)),
                int(1),
            ],
        );
        assert!(!same.is_satisfied_by(&solution()));

        let equal = Expression::binary(
            BinaryOperator::Equal,
            Expression::constant(Literal::new_typed_literal("01", xsd::INTEGER)),
            int(1),
        );
        assert!(equal.is_satisfied_by(&solution()));
    }

    #[test]
    fn uuid_functions() {
        let Ok(TypedValue::NamedNode(iri)) =
            Expression::call(BuiltinFunction::Uuid, Vec::new()).evaluate(&solution())
        else {
            panic!("UUID() must return an IRI");
        };
        assert!(iri.as_str().starts_with("urn:uuid:"));

        let Ok(TypedValue::SimpleLiteral(value)) =
            Expression::call(BuiltinFunction::StrUuid, Vec::new()).evaluate(&solution())
        else {
            panic!("STRUUID() must return a simple literal");
        };
        assert_eq!(value.len(), 36);
    }
}
