//! Resolved expression trees.
//!
//! An `Expression` has already been through name and type binding: every
//! function node carries the concrete overload resolution picked for it.
//! Evaluation against a bound row is therefore total, pure, and free of
//! error paths; NULL and MISSING flow through as values, not failures.

use crate::data::{ExprType, ExprValue, Row};
use crate::expression::error::ExpressionResult;
use crate::expression::function::{builtins, FunctionName, ScalarFunction};
use std::fmt;

/// A typed, resolved expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal constant value
    Literal(ExprValue),

    /// Field reference, typed from the index mapping
    Reference { name: String, field_type: ExprType },

    /// Call to a resolved function overload
    Function {
        function: ScalarFunction,
        args: Vec<Expression>,
    },
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: ExprValue) -> Self {
        Expression::Literal(value)
    }

    /// Create a field reference expression
    pub fn field(name: impl Into<String>, field_type: ExprType) -> Self {
        Expression::Reference {
            name: name.into(),
            field_type,
        }
    }

    /// Resolve a call against the built-in catalog and wrap the arguments.
    /// This is where the resolution error taxonomy surfaces; a returned
    /// expression can no longer fail.
    pub fn call(name: impl AsRef<str>, args: Vec<Expression>) -> ExpressionResult<Self> {
        let arg_types: Vec<ExprType> = args.iter().map(Expression::type_of).collect();
        let function = builtins().resolve(&FunctionName::of(name), &arg_types)?;
        Ok(Expression::Function {
            function: function.clone(),
            args,
        })
    }

    /// The static type this expression produces.
    pub fn type_of(&self) -> ExprType {
        match self {
            Expression::Literal(value) => value.type_of(),
            Expression::Reference { field_type, .. } => *field_type,
            Expression::Function { function, .. } => function.return_type(),
        }
    }

    /// Evaluate against one bound row. Always produces exactly one value,
    /// possibly NULL or MISSING, and never a propagating failure.
    pub fn evaluate(&self, row: &Row) -> ExprValue {
        match self {
            Expression::Literal(value) => value.clone(),
            Expression::Reference { name, field_type } => row.resolve_as(name, *field_type),
            Expression::Function { function, args } => {
                let values: Vec<ExprValue> = args.iter().map(|arg| arg.evaluate(row)).collect();
                function.invoke(&values)
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Reference { name, .. } => write!(f, "{}", name),
            Expression::Function { function, args } => {
                write!(f, "{}(", function.signature().name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// An output expression carrying its column name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedExpression {
    pub name: String,
    pub expr: Expression,
}

impl NamedExpression {
    pub fn new(name: impl Into<String>, expr: Expression) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }
}

impl fmt::Display for NamedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.expr.to_string();
        if rendered == self.name {
            write!(f, "{}", rendered)
        } else {
            write!(f, "{} AS {}", rendered, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_evaluation() {
        let row = Row::empty();
        assert_eq!(
            Expression::literal(ExprValue::Long(42)).evaluate(&row),
            ExprValue::Long(42)
        );
        assert_eq!(
            Expression::literal(ExprValue::Null).evaluate(&row),
            ExprValue::Null
        );
    }

    #[test]
    fn test_reference_binding_contract() {
        let row = Row::new(json!({"age": 30, "name": null}));
        let age = Expression::field("age", ExprType::Integer);
        let name = Expression::field("name", ExprType::String);
        let city = Expression::field("city", ExprType::String);

        assert_eq!(age.evaluate(&row), ExprValue::Integer(30));
        assert_eq!(name.evaluate(&row), ExprValue::Null);
        assert_eq!(city.evaluate(&row), ExprValue::Missing);
    }

    #[test]
    fn test_call_resolves_and_types() {
        let sum = Expression::call(
            "+",
            vec![
                Expression::field("age", ExprType::Integer),
                Expression::literal(ExprValue::Integer(1)),
            ],
        )
        .unwrap();
        assert_eq!(sum.type_of(), ExprType::Integer);

        let row = Row::new(json!({"age": 30}));
        assert_eq!(sum.evaluate(&row), ExprValue::Integer(31));
    }

    #[test]
    fn test_call_unknown_function() {
        let err = Expression::call("frobnicate", vec![]).unwrap_err();
        assert_eq!(
            err,
            crate::expression::ExpressionError::UnknownFunction(FunctionName::of("frobnicate"))
        );
    }

    #[test]
    fn test_division_by_zero_propagates_into_isnull() {
        // isnull(1 + 1 * 1 / 0) is TRUE: the division yields NULL, which
        // propagates through the addition into a concrete boolean.
        let one = || Expression::literal(ExprValue::Long(1));
        let zero = Expression::literal(ExprValue::Long(0));
        let division = Expression::call("/", vec![one(), zero]).unwrap();
        let product = Expression::call("*", vec![one(), division]).unwrap();
        let sum = Expression::call("+", vec![one(), product]).unwrap();
        let check = Expression::call("isnull", vec![sum]).unwrap();

        assert_eq!(check.evaluate(&Row::empty()), ExprValue::Boolean(true));

        // Without the zero divisor the same shape is concrete
        let product = Expression::call("*", vec![one(), one()]).unwrap();
        let sum = Expression::call("+", vec![one(), product]).unwrap();
        let check = Expression::call("isnull", vec![sum]).unwrap();
        assert_eq!(check.evaluate(&Row::empty()), ExprValue::Boolean(false));
    }

    #[test]
    fn test_missing_field_flows_through_predicates() {
        let row = Row::new(json!({"age": 30}));
        let absent = Expression::field("salary", ExprType::Integer);

        let not_null = Expression::call("is not null", vec![absent.clone()]).unwrap();
        assert_eq!(not_null.evaluate(&row), ExprValue::Boolean(true));

        let fallback = Expression::call(
            "ifnull",
            vec![absent, Expression::literal(ExprValue::Integer(0))],
        )
        .unwrap();
        assert_eq!(fallback.evaluate(&row), ExprValue::Integer(0));
    }

    #[test]
    fn test_display() {
        let expr = Expression::call(
            ">",
            vec![
                Expression::field("age", ExprType::Integer),
                Expression::literal(ExprValue::Integer(18)),
            ],
        )
        .unwrap();
        assert_eq!(expr.to_string(), ">(age, 18)");

        let named = NamedExpression::new("adult", expr);
        assert_eq!(named.to_string(), ">(age, 18) AS adult");

        let plain = NamedExpression::new("age", Expression::field("age", ExprType::Integer));
        assert_eq!(plain.to_string(), "age");
    }
}
