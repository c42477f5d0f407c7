//! Typed expressions and the built-in function catalog.
//!
//! This module provides:
//! - The resolved expression tree and its evaluation semantics
//! - The function registry and cost-based overload resolution
//! - Built-in operator families with NULL/MISSING-aware behavior
//! - Aggregate functions with an accumulate lifecycle

pub mod aggregate;
pub mod error;
pub mod expr;
pub mod function;
pub mod operator;

pub use aggregate::{AggregateState, Aggregator};
pub use error::{ExpressionError, ExpressionResult};
pub use expr::{Expression, NamedExpression};
pub use function::{
    builtins, FunctionName, FunctionRepository, FunctionSignature, ScalarFunction,
};
