use crate::sparql::QueryEvaluationError;
use rdf_sage_physical::expression::{
    BinaryOperator, BuiltinFunction, Expression as SageExpression, UnaryOperator,
};
use spargebra::algebra::{Expression, Function};

/// Rewrites spargebra FILTER expressions into the expressions evaluated by the filter operator.
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct ExpressionRewriter;

impl ExpressionRewriter {
    /// Rewrites an [Expression].
    pub fn rewrite(&self, expression: &Expression) -> Result<SageExpression, QueryEvaluationError> {
        Ok(match expression {
            Expression::NamedNode(node) => SageExpression::constant(node.clone()),
            Expression::Literal(literal) => SageExpression::constant(literal.clone()),
            Expression::Variable(variable) => SageExpression::variable(variable.clone()),
            Expression::Bound(variable) => SageExpression::Bound(variable.clone()),
            Expression::Or(lhs, rhs) => self.binary(BinaryOperator::Or, lhs, rhs)?,
            Expression::And(lhs, rhs) => self.binary(BinaryOperator::And, lhs, rhs)?,
            Expression::Equal(lhs, rhs) => self.binary(BinaryOperator::Equal, lhs, rhs)?,
            Expression::Greater(lhs, rhs) => self.binary(BinaryOperator::Greater, lhs, rhs)?,
            Expression::GreaterOrEqual(lhs, rhs) => {
                self.binary(BinaryOperator::GreaterOrEqual, lhs, rhs)?
            }
            Expression::Less(lhs, rhs) => self.binary(BinaryOperator::Less, lhs, rhs)?,
            Expression::LessOrEqual(lhs, rhs) => {
                self.binary(BinaryOperator::LessOrEqual, lhs, rhs)?
            }
            Expression::Add(lhs, rhs) => self.binary(BinaryOperator::Add, lhs, rhs)?,
            Expression::Subtract(lhs, rhs) => self.binary(BinaryOperator::Subtract, lhs, rhs)?,
            Expression::Multiply(lhs, rhs) => self.binary(BinaryOperator::Multiply, lhs, rhs)?,
            Expression::Divide(lhs, rhs) => self.binary(BinaryOperator::Divide, lhs, rhs)?,
            Expression::SameTerm(lhs, rhs) => SageExpression::call(
                BuiltinFunction::SameTerm,
                vec![self.rewrite(lhs)?, self.rewrite(rhs)?],
            ),
            Expression::In(needle, haystack) => self.rewrite_in(needle, haystack, false)?,
            // The parser turns `!=` and `NOT IN` into negations.
            Expression::Not(inner) => match inner.as_ref() {
                Expression::Equal(lhs, rhs) => self.binary(BinaryOperator::NotEqual, lhs, rhs)?,
                Expression::In(needle, haystack) => self.rewrite_in(needle, haystack, true)?,
                inner => SageExpression::unary(UnaryOperator::Not, self.rewrite(inner)?),
            },
            Expression::UnaryPlus(inner) => {
                SageExpression::unary(UnaryOperator::Plus, self.rewrite(inner)?)
            }
            Expression::UnaryMinus(inner) => {
                SageExpression::unary(UnaryOperator::Minus, self.rewrite(inner)?)
            }
            Expression::FunctionCall(function, arguments) => {
                self.rewrite_function_call(function, arguments)?
            }
            Expression::Exists(_) => return QueryEvaluationError::unsupported("EXISTS"),
            Expression::If(..) => return QueryEvaluationError::unsupported("IF"),
            Expression::Coalesce(_) => return QueryEvaluationError::unsupported("COALESCE"),
        })
    }

    fn binary(
        &self,
        operator: BinaryOperator,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<SageExpression, QueryEvaluationError> {
        Ok(SageExpression::binary(
            operator,
            self.rewrite(lhs)?,
            self.rewrite(rhs)?,
        ))
    }

    fn rewrite_in(
        &self,
        needle: &Expression,
        haystack: &[Expression],
        negated: bool,
    ) -> Result<SageExpression, QueryEvaluationError> {
        Ok(SageExpression::In {
            needle: Box::new(self.rewrite(needle)?),
            haystack: haystack
                .iter()
                .map(|expression| self.rewrite(expression))
                .collect::<Result<Vec<_>, _>>()?,
            negated,
        })
    }

    /// Rewrites a SPARQL function call.
    ///
    /// We assume here that the length of `arguments` matches the expected number of arguments.
    fn rewrite_function_call(
        &self,
        function: &Function,
        arguments: &[Expression],
    ) -> Result<SageExpression, QueryEvaluationError> {
        let function = match function {
            Function::IsIri => BuiltinFunction::IsIri,
            Function::IsBlank => BuiltinFunction::IsBlank,
            Function::IsLiteral => BuiltinFunction::IsLiteral,
            Function::IsNumeric => BuiltinFunction::IsNumeric,
            Function::Str => BuiltinFunction::Str,
            Function::Lang => BuiltinFunction::Lang,
            Function::Datatype => BuiltinFunction::Datatype,
            Function::Uuid => BuiltinFunction::Uuid,
            Function::StrUuid => BuiltinFunction::StrUuid,
            function => {
                return QueryEvaluationError::unsupported(format!("The function {function}"))
            }
        };

        let arguments = arguments
            .iter()
            .map(|argument| self.rewrite(argument))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SageExpression::call(function, arguments))
    }
}
