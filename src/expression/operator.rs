//! Built-in operator families, registered into the function repository at
//! startup.
//!
//! The general marker policy, shared by every family that does not state
//! otherwise: if any argument is MISSING the result is MISSING, else if
//! any argument is NULL the result is NULL, else the concrete
//! implementation runs. Families that need to observe the markers
//! themselves (the null predicates, ifnull, nullif, and/or) register raw
//! implementations.

pub mod arithmetic;
pub mod predicate;

use crate::data::ExprValue;
use crate::expression::function::ScalarImpl;
use std::sync::Arc;

/// Wrap a concrete implementation with the marker policy.
pub(crate) fn null_preserving<F>(f: F) -> ScalarImpl
where
    F: Fn(&[ExprValue]) -> ExprValue + Send + Sync + 'static,
{
    Arc::new(move |args| {
        if args.iter().any(ExprValue::is_missing) {
            return ExprValue::Missing;
        }
        if args.iter().any(ExprValue::is_null) {
            return ExprValue::Null;
        }
        f(args)
    })
}

/// An implementation that handles NULL and MISSING itself.
pub(crate) fn marker_aware<F>(f: F) -> ScalarImpl
where
    F: Fn(&[ExprValue]) -> ExprValue + Send + Sync + 'static,
{
    Arc::new(f)
}
