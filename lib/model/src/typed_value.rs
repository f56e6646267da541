use crate::{ThinError, ThinResult};
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef, Term};
use oxsdatatypes::{Boolean, Decimal, Double, Float, Integer};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A numeric value of the SPARQL numeric type tower.
///
/// All members of the `xsd:integer` family (`xsd:int`, `xsd:long`, ...) are represented as
/// [Numeric::Integer].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeric {
    Integer(Integer),
    Decimal(Decimal),
    Float(Float),
    Double(Double),
}

/// Two operands promoted to their common numeric type.
enum NumericPair {
    Integer(Integer, Integer),
    Decimal(Decimal, Decimal),
    Float(Float, Float),
    Double(Double, Double),
}

impl NumericPair {
    fn new(lhs: Numeric, rhs: Numeric) -> NumericPair {
        match (lhs, rhs) {
            (Numeric::Integer(lhs), Numeric::Integer(rhs)) => NumericPair::Integer(lhs, rhs),
            (Numeric::Integer(lhs), Numeric::Decimal(rhs)) => NumericPair::Decimal(lhs.into(), rhs),
            (Numeric::Decimal(lhs), Numeric::Integer(rhs)) => NumericPair::Decimal(lhs, rhs.into()),
            (Numeric::Decimal(lhs), Numeric::Decimal(rhs)) => NumericPair::Decimal(lhs, rhs),
            (Numeric::Double(lhs), rhs) => NumericPair::Double(lhs, rhs.to_double()),
            (lhs, Numeric::Double(rhs)) => NumericPair::Double(lhs.to_double(), rhs),
            (lhs, rhs) => NumericPair::Float(lhs.to_float(), rhs.to_float()),
        }
    }
}

impl Numeric {
    fn to_float(self) -> Float {
        match self {
            Numeric::Integer(value) => value.into(),
            Numeric::Decimal(value) => value.into(),
            Numeric::Float(value) => value,
            Numeric::Double(value) => value.into(),
        }
    }

    fn to_double(self) -> Double {
        match self {
            Numeric::Integer(value) => value.into(),
            Numeric::Decimal(value) => value.into(),
            Numeric::Float(value) => value.into(),
            Numeric::Double(value) => value,
        }
    }

    fn binary(
        self,
        rhs: Numeric,
        integer_op: impl FnOnce(Integer, Integer) -> Option<Integer>,
        decimal_op: impl FnOnce(Decimal, Decimal) -> Option<Decimal>,
        float_op: impl FnOnce(Float, Float) -> Float,
        double_op: impl FnOnce(Double, Double) -> Double,
    ) -> ThinResult<Numeric> {
        Ok(match NumericPair::new(self, rhs) {
            NumericPair::Integer(lhs, rhs) => {
                Numeric::Integer(integer_op(lhs, rhs).ok_or(ThinError::default())?)
            }
            NumericPair::Decimal(lhs, rhs) => {
                Numeric::Decimal(decimal_op(lhs, rhs).ok_or(ThinError::default())?)
            }
            NumericPair::Float(lhs, rhs) => Numeric::Float(float_op(lhs, rhs)),
            NumericPair::Double(lhs, rhs) => Numeric::Double(double_op(lhs, rhs)),
        })
    }

    /// [op:numeric-add](https://www.w3.org/TR/xpath-functions-31/#func-numeric-add)
    pub fn checked_add(self, rhs: Numeric) -> ThinResult<Numeric> {
        self.binary(
            rhs,
            |lhs, rhs| lhs.checked_add(rhs),
            |lhs, rhs| lhs.checked_add(rhs),
            |lhs, rhs| lhs + rhs,
            |lhs, rhs| lhs + rhs,
        )
    }

    /// [op:numeric-subtract](https://www.w3.org/TR/xpath-functions-31/#func-numeric-subtract)
    pub fn checked_sub(self, rhs: Numeric) -> ThinResult<Numeric> {
        self.binary(
            rhs,
            |lhs, rhs| lhs.checked_sub(rhs),
            |lhs, rhs| lhs.checked_sub(rhs),
            |lhs, rhs| lhs - rhs,
            |lhs, rhs| lhs - rhs,
        )
    }

    /// [op:numeric-multiply](https://www.w3.org/TR/xpath-functions-31/#func-numeric-multiply)
    pub fn checked_mul(self, rhs: Numeric) -> ThinResult<Numeric> {
        self.binary(
            rhs,
            |lhs, rhs| lhs.checked_mul(rhs),
            |lhs, rhs| lhs.checked_mul(rhs),
            |lhs, rhs| lhs * rhs,
            |lhs, rhs| lhs * rhs,
        )
    }

    /// [op:numeric-divide](https://www.w3.org/TR/xpath-functions-31/#func-numeric-divide)
    ///
    /// Dividing two integers yields a decimal. Division by zero is an error for integers and
    /// decimals.
    pub fn checked_div(self, rhs: Numeric) -> ThinResult<Numeric> {
        if let NumericPair::Integer(lhs, rhs) = NumericPair::new(self, rhs) {
            let quotient = Decimal::from(lhs).checked_div(rhs).ok_or(ThinError::default())?;
            return Ok(Numeric::Decimal(quotient));
        }

        self.binary(
            rhs,
            |lhs, rhs| lhs.checked_div(rhs),
            |lhs, rhs| lhs.checked_div(rhs),
            |lhs, rhs| lhs / rhs,
            |lhs, rhs| lhs / rhs,
        )
    }

    /// [op:numeric-unary-minus](https://www.w3.org/TR/xpath-functions-31/#func-numeric-unary-minus)
    pub fn checked_neg(self) -> ThinResult<Numeric> {
        Ok(match self {
            Numeric::Integer(value) => {
                Numeric::Integer(value.checked_neg().ok_or(ThinError::default())?)
            }
            Numeric::Decimal(value) => {
                Numeric::Decimal(value.checked_neg().ok_or(ThinError::default())?)
            }
            Numeric::Float(value) => Numeric::Float(-value),
            Numeric::Double(value) => Numeric::Double(-value),
        })
    }

    /// Compares two numerics after type promotion. Returns [None] if a NaN is involved.
    pub fn compare(self, rhs: Numeric) -> Option<Ordering> {
        match NumericPair::new(self, rhs) {
            NumericPair::Integer(lhs, rhs) => Some(lhs.cmp(&rhs)),
            NumericPair::Decimal(lhs, rhs) => Some(lhs.cmp(&rhs)),
            NumericPair::Float(lhs, rhs) => lhs.partial_cmp(&rhs),
            NumericPair::Double(lhs, rhs) => lhs.partial_cmp(&rhs),
        }
    }

    pub fn is_zero_or_nan(self) -> bool {
        match self {
            Numeric::Integer(value) => value == Integer::from(0),
            Numeric::Decimal(value) => value == Decimal::from(0),
            Numeric::Float(value) => value == Float::from(0_f32) || value.is_nan(),
            Numeric::Double(value) => value == Double::from(0_f64) || value.is_nan(),
        }
    }

    pub fn datatype(self) -> NamedNodeRef<'static> {
        match self {
            Numeric::Integer(_) => xsd::INTEGER,
            Numeric::Decimal(_) => xsd::DECIMAL,
            Numeric::Float(_) => xsd::FLOAT,
            Numeric::Double(_) => xsd::DOUBLE,
        }
    }
}

impl Display for Numeric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Numeric::Integer(value) => value.fmt(f),
            Numeric::Decimal(value) => value.fmt(f),
            Numeric::Float(value) => value.fmt(f),
            Numeric::Double(value) => value.fmt(f),
        }
    }
}

/// The value of an RDF term, interpreted according to its datatype.
///
/// Literals whose lexical form is not valid for their datatype end up as
/// [TypedValue::OtherLiteral], just like literals of unknown datatypes.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    BooleanLiteral(bool),
    NumericLiteral(Numeric),
    /// A literal of type `xsd:string` without a language tag.
    SimpleLiteral(String),
    LanguageStringLiteral { value: String, language: String },
    OtherLiteral(Literal),
}

impl TypedValue {
    pub fn from_term(term: &Term) -> TypedValue {
        match term {
            Term::NamedNode(node) => TypedValue::NamedNode(node.clone()),
            Term::BlankNode(node) => TypedValue::BlankNode(node.clone()),
            Term::Literal(literal) => TypedValue::from_literal(literal),
        }
    }

    pub fn from_literal(literal: &Literal) -> TypedValue {
        if let Some(language) = literal.language() {
            return TypedValue::LanguageStringLiteral {
                value: literal.value().to_owned(),
                language: language.to_owned(),
            };
        }

        let value = literal.value();
        let parsed = match literal.datatype() {
            xsd::STRING => Some(TypedValue::SimpleLiteral(value.to_owned())),
            xsd::BOOLEAN => {
                parse(value).map(|value: Boolean| TypedValue::BooleanLiteral(value.into()))
            }
            xsd::DECIMAL => parse(value).map(Numeric::Decimal).map(Into::into),
            xsd::FLOAT => parse(value).map(Numeric::Float).map(Into::into),
            xsd::DOUBLE => parse(value).map(Numeric::Double).map(Into::into),
            datatype if is_integer_datatype(datatype) => {
                parse(value).map(Numeric::Integer).map(Into::into)
            }
            _ => None,
        };
        parsed.unwrap_or_else(|| TypedValue::OtherLiteral(literal.clone()))
    }

    pub fn into_term(self) -> Term {
        match self {
            TypedValue::NamedNode(node) => node.into(),
            TypedValue::BlankNode(node) => node.into(),
            TypedValue::BooleanLiteral(value) => Literal::from(value).into(),
            TypedValue::NumericLiteral(value) => {
                Literal::new_typed_literal(value.to_string(), value.datatype()).into()
            }
            TypedValue::SimpleLiteral(value) => Literal::new_simple_literal(value).into(),
            TypedValue::LanguageStringLiteral { value, language } => {
                Literal::new_language_tagged_literal_unchecked(value, language).into()
            }
            TypedValue::OtherLiteral(literal) => literal.into(),
        }
    }

    pub fn is_literal(&self) -> bool {
        !matches!(self, TypedValue::NamedNode(_) | TypedValue::BlankNode(_))
    }

    /// The datatype of a literal value. Returns an error for IRIs and blank nodes.
    pub fn datatype(&self) -> ThinResult<NamedNode> {
        Ok(match self {
            TypedValue::NamedNode(_) | TypedValue::BlankNode(_) => return ThinError::expected(),
            TypedValue::BooleanLiteral(_) => xsd::BOOLEAN.into_owned(),
            TypedValue::NumericLiteral(value) => value.datatype().into_owned(),
            TypedValue::SimpleLiteral(_) => xsd::STRING.into_owned(),
            TypedValue::LanguageStringLiteral { .. } => rdf::LANG_STRING.into_owned(),
            TypedValue::OtherLiteral(literal) => literal.datatype().into_owned(),
        })
    }

    /// [Effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv)
    pub fn effective_boolean_value(&self) -> ThinResult<bool> {
        match self {
            TypedValue::BooleanLiteral(value) => Ok(*value),
            TypedValue::NumericLiteral(value) => Ok(!value.is_zero_or_nan()),
            TypedValue::SimpleLiteral(value) => Ok(!value.is_empty()),
            TypedValue::OtherLiteral(literal) if literal.datatype() == xsd::BOOLEAN => Ok(false),
            TypedValue::OtherLiteral(literal) if is_numeric_datatype(literal.datatype()) => {
                Ok(false)
            }
            _ => ThinError::expected(),
        }
    }

    /// [RDFterm-equal](https://www.w3.org/TR/sparql11-query/#func-RDFterm-equal) extended with
    /// value equality for the known literal types.
    ///
    /// Returns an error if two literals cannot be compared (e.g., unknown datatypes with distinct
    /// lexical forms).
    pub fn sparql_eq(&self, other: &TypedValue) -> ThinResult<bool> {
        match (self, other) {
            (TypedValue::NumericLiteral(lhs), TypedValue::NumericLiteral(rhs)) => {
                Ok(lhs.compare(*rhs) == Some(Ordering::Equal))
            }
            (TypedValue::OtherLiteral(lhs), TypedValue::OtherLiteral(rhs)) => {
                if lhs == rhs {
                    Ok(true)
                } else {
                    ThinError::expected()
                }
            }
            (TypedValue::OtherLiteral(_), rhs) if rhs.is_literal() => ThinError::expected(),
            (lhs, TypedValue::OtherLiteral(_)) if lhs.is_literal() => ThinError::expected(),
            (lhs, rhs) => Ok(lhs == rhs),
        }
    }

    /// Compares two values for the SPARQL relational operators `<`, `<=`, `>`, and `>=`.
    ///
    /// Only numerics, simple literals, booleans, and language strings with the same tag can be
    /// ordered. Mixing kinds is an error.
    pub fn sparql_cmp(&self, other: &TypedValue) -> ThinResult<Ordering> {
        match (self, other) {
            (TypedValue::NumericLiteral(lhs), TypedValue::NumericLiteral(rhs)) => {
                lhs.compare(*rhs).ok_or(ThinError::default())
            }
            (TypedValue::SimpleLiteral(lhs), TypedValue::SimpleLiteral(rhs)) => Ok(lhs.cmp(rhs)),
            (TypedValue::BooleanLiteral(lhs), TypedValue::BooleanLiteral(rhs)) => Ok(lhs.cmp(rhs)),
            (
                TypedValue::LanguageStringLiteral {
                    value: lhs,
                    language: lhs_language,
                },
                TypedValue::LanguageStringLiteral {
                    value: rhs,
                    language: rhs_language,
                },
            ) if lhs_language == rhs_language => Ok(lhs.cmp(rhs)),
            _ => ThinError::expected(),
        }
    }
}

impl From<Numeric> for TypedValue {
    fn from(value: Numeric) -> Self {
        TypedValue::NumericLiteral(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::BooleanLiteral(value)
    }
}

fn parse<T: FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}

fn is_integer_datatype(datatype: NamedNodeRef<'_>) -> bool {
    [
        xsd::INTEGER,
        xsd::LONG,
        xsd::INT,
        xsd::SHORT,
        xsd::BYTE,
        xsd::NON_NEGATIVE_INTEGER,
        xsd::NON_POSITIVE_INTEGER,
        xsd::NEGATIVE_INTEGER,
        xsd::POSITIVE_INTEGER,
        xsd::UNSIGNED_LONG,
        xsd::UNSIGNED_INT,
        xsd::UNSIGNED_SHORT,
        xsd::UNSIGNED_BYTE,
    ]
    .contains(&datatype)
}

fn is_numeric_datatype(datatype: NamedNodeRef<'_>) -> bool {
    is_integer_datatype(datatype) || [xsd::DECIMAL, xsd::FLOAT, xsd::DOUBLE].contains(&datatype)
}
