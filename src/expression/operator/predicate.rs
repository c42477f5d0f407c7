//! Predicate operators: comparisons, boolean connectives, and the null
//! predicate family.
//!
//! The null predicates are the one family that inspects the markers
//! directly instead of propagating them:
//!
//! - `is null` / `isnull` return a concrete boolean, TRUE exactly when
//!   the argument is the NULL marker
//! - `ifnull(a, b)` returns `b` when `a` is NULL or MISSING, treating the
//!   two markers identically
//! - `nullif(a, b)` returns the NULL marker only when both arguments are
//!   concrete and value-equal
//!
//! `is null` and `isnull` are two separately registered names sharing one
//! implementation; neither supersedes the other.

use crate::data::{ExprType, ExprValue};
use crate::expression::function::{FunctionName, FunctionRepository, ScalarFunction};
use crate::expression::operator::{marker_aware, null_preserving};
use std::cmp::Ordering;

pub fn register(repository: &mut FunctionRepository) {
    register_comparisons(repository);
    register_connectives(repository);
    register_not(repository);
    register_null_checks(repository);
    register_ifnull(repository);
    register_nullif(repository);
}

const ORDERED_TYPES: [ExprType; 9] = [
    ExprType::Short,
    ExprType::Integer,
    ExprType::Long,
    ExprType::Float,
    ExprType::Double,
    ExprType::String,
    ExprType::Date,
    ExprType::Time,
    ExprType::Timestamp,
];

fn register_comparisons(repository: &mut FunctionRepository) {
    // Equality is defined for every core type
    for operand_type in ExprType::core_types() {
        repository.register(comparison("=", *operand_type, |a, b| a.same_value(b)));
        repository.register(comparison("!=", *operand_type, |a, b| !a.same_value(b)));
    }
    // Ordering only for types with a defined order
    for operand_type in ORDERED_TYPES {
        repository.register(ordering("<", operand_type, |ord| ord == Ordering::Less));
        repository.register(ordering("<=", operand_type, |ord| ord != Ordering::Greater));
        repository.register(ordering(">", operand_type, |ord| ord == Ordering::Greater));
        repository.register(ordering(">=", operand_type, |ord| ord != Ordering::Less));
    }
}

fn comparison<F>(name: &str, operand_type: ExprType, test: F) -> ScalarFunction
where
    F: Fn(&ExprValue, &ExprValue) -> bool + Send + Sync + 'static,
{
    ScalarFunction::new(
        FunctionName::of(name),
        vec![operand_type, operand_type],
        ExprType::Boolean,
        null_preserving(move |args| ExprValue::Boolean(test(&args[0], &args[1]))),
    )
}

fn ordering<F>(name: &str, operand_type: ExprType, test: F) -> ScalarFunction
where
    F: Fn(Ordering) -> bool + Send + Sync + 'static,
{
    ScalarFunction::new(
        FunctionName::of(name),
        vec![operand_type, operand_type],
        ExprType::Boolean,
        null_preserving(move |args| match args[0].compare(&args[1]) {
            Some(ord) => ExprValue::Boolean(test(ord)),
            None => ExprValue::Null,
        }),
    )
}

/// AND/OR short-circuit on their absorbing element before the markers are
/// considered, so `false AND NULL` is FALSE and `true OR MISSING` is TRUE.
/// In all other marker cases MISSING wins over NULL.
fn register_connectives(repository: &mut FunctionRepository) {
    repository.register(connective("and", |a, b| {
        if a.as_bool() == Some(false) || b.as_bool() == Some(false) {
            ExprValue::Boolean(false)
        } else if a.is_missing() || b.is_missing() {
            ExprValue::Missing
        } else if a.is_null() || b.is_null() {
            ExprValue::Null
        } else {
            ExprValue::Boolean(a.as_bool() == Some(true) && b.as_bool() == Some(true))
        }
    }));
    repository.register(connective("or", |a, b| {
        if a.as_bool() == Some(true) || b.as_bool() == Some(true) {
            ExprValue::Boolean(true)
        } else if a.is_missing() || b.is_missing() {
            ExprValue::Missing
        } else if a.is_null() || b.is_null() {
            ExprValue::Null
        } else {
            ExprValue::Boolean(a.as_bool() == Some(true) || b.as_bool() == Some(true))
        }
    }));
    repository.register(ScalarFunction::new(
        FunctionName::of("xor"),
        vec![ExprType::Boolean, ExprType::Boolean],
        ExprType::Boolean,
        null_preserving(|args| {
            ExprValue::Boolean(args[0].as_bool() != args[1].as_bool())
        }),
    ));
}

fn connective<F>(name: &str, table: F) -> ScalarFunction
where
    F: Fn(&ExprValue, &ExprValue) -> ExprValue + Send + Sync + 'static,
{
    ScalarFunction::new(
        FunctionName::of(name),
        vec![ExprType::Boolean, ExprType::Boolean],
        ExprType::Boolean,
        marker_aware(move |args| table(&args[0], &args[1])),
    )
}

fn register_not(repository: &mut FunctionRepository) {
    repository.register(ScalarFunction::new(
        FunctionName::of("not"),
        vec![ExprType::Boolean],
        ExprType::Boolean,
        null_preserving(|args| match args[0].as_bool() {
            Some(v) => ExprValue::Boolean(!v),
            None => unreachable!("operand types checked at resolution"),
        }),
    ));
}

/// One signature per core type plus one for untyped arguments, so a
/// literal NULL argument resolves deterministically instead of tying
/// across the per-type family.
fn null_check_family(name: &str, implementation: fn(&[ExprValue]) -> ExprValue) -> Vec<ScalarFunction> {
    let mut family: Vec<ScalarFunction> = ExprType::core_types()
        .iter()
        .map(|operand_type| {
            ScalarFunction::new(
                FunctionName::of(name),
                vec![*operand_type],
                ExprType::Boolean,
                marker_aware(implementation),
            )
        })
        .collect();
    family.push(ScalarFunction::new(
        FunctionName::of(name),
        vec![ExprType::Unknown],
        ExprType::Boolean,
        marker_aware(implementation),
    ));
    family
}

fn register_null_checks(repository: &mut FunctionRepository) {
    fn value_is_null(args: &[ExprValue]) -> ExprValue {
        ExprValue::Boolean(args[0].is_null())
    }
    fn value_is_not_null(args: &[ExprValue]) -> ExprValue {
        ExprValue::Boolean(!args[0].is_null())
    }

    for function in null_check_family("is null", value_is_null) {
        repository.register(function);
    }
    for function in null_check_family("isnull", value_is_null) {
        repository.register(function);
    }
    for function in null_check_family("is not null", value_is_not_null) {
        repository.register(function);
    }
}

fn register_ifnull(repository: &mut FunctionRepository) {
    for operand_type in flow_control_types() {
        repository.register(ScalarFunction::new(
            FunctionName::of("ifnull"),
            vec![operand_type, operand_type],
            operand_type,
            marker_aware(|args| {
                if args[0].is_null() || args[0].is_missing() {
                    args[1].clone()
                } else {
                    args[0].clone()
                }
            }),
        ));
    }
}

fn register_nullif(repository: &mut FunctionRepository) {
    for operand_type in flow_control_types() {
        repository.register(ScalarFunction::new(
            FunctionName::of("nullif"),
            vec![operand_type, operand_type],
            operand_type,
            marker_aware(|args| {
                let (a, b) = (&args[0], &args[1]);
                if a.is_null() || a.is_missing() || b.is_null() || b.is_missing() {
                    a.clone()
                } else if a.same_value(b) {
                    ExprValue::Null
                } else {
                    a.clone()
                }
            }),
        ));
    }
}

/// ifnull/nullif accept every core type and untyped arguments.
fn flow_control_types() -> impl Iterator<Item = ExprType> {
    ExprType::core_types()
        .iter()
        .copied()
        .chain(std::iter::once(ExprType::Unknown))
}
