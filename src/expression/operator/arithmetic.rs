//! Arithmetic operators.
//!
//! Each operator registers one uniform `T, T -> T` signature per numeric
//! core type. Division and modulo by zero evaluate to NULL; arithmetic is
//! total over its declared domain and never raises.

use crate::data::{ExprType, ExprValue};
use crate::expression::function::{FunctionName, FunctionRepository, ScalarFunction, ScalarImpl};
use crate::expression::operator::null_preserving;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOp {
    fn name(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
            ArithmeticOp::Modulo => "%",
        }
    }
}

const NUMERIC_TYPES: [ExprType; 5] = [
    ExprType::Short,
    ExprType::Integer,
    ExprType::Long,
    ExprType::Float,
    ExprType::Double,
];

pub fn register(repository: &mut FunctionRepository) {
    for op in [
        ArithmeticOp::Add,
        ArithmeticOp::Subtract,
        ArithmeticOp::Multiply,
        ArithmeticOp::Divide,
        ArithmeticOp::Modulo,
    ] {
        for operand_type in NUMERIC_TYPES {
            repository.register(ScalarFunction::new(
                FunctionName::of(op.name()),
                vec![operand_type, operand_type],
                operand_type,
                arithmetic_impl(op, operand_type),
            ));
        }
    }
}

fn arithmetic_impl(op: ArithmeticOp, result_type: ExprType) -> ScalarImpl {
    null_preserving(move |args| {
        if matches!(result_type, ExprType::Float | ExprType::Double) {
            fractional(op, result_type, &args[0], &args[1])
        } else {
            integral(op, result_type, &args[0], &args[1])
        }
    })
}

fn integral(op: ArithmeticOp, result_type: ExprType, a: &ExprValue, b: &ExprValue) -> ExprValue {
    let (Some(a), Some(b)) = (a.as_long(), b.as_long()) else {
        unreachable!("operand types checked at resolution");
    };
    let result = match op {
        ArithmeticOp::Add => a.wrapping_add(b),
        ArithmeticOp::Subtract => a.wrapping_sub(b),
        ArithmeticOp::Multiply => a.wrapping_mul(b),
        ArithmeticOp::Divide => {
            if b == 0 {
                return ExprValue::Null;
            }
            a.wrapping_div(b)
        }
        ArithmeticOp::Modulo => {
            if b == 0 {
                return ExprValue::Null;
            }
            a.wrapping_rem(b)
        }
    };
    match result_type {
        ExprType::Short => ExprValue::Short(result as i16),
        ExprType::Integer => ExprValue::Integer(result as i32),
        _ => ExprValue::Long(result),
    }
}

fn fractional(op: ArithmeticOp, result_type: ExprType, a: &ExprValue, b: &ExprValue) -> ExprValue {
    let (Some(a), Some(b)) = (a.as_double(), b.as_double()) else {
        unreachable!("operand types checked at resolution");
    };
    let result = match op {
        ArithmeticOp::Add => a + b,
        ArithmeticOp::Subtract => a - b,
        ArithmeticOp::Multiply => a * b,
        ArithmeticOp::Divide => {
            if b == 0.0 {
                return ExprValue::Null;
            }
            a / b
        }
        ArithmeticOp::Modulo => {
            if b == 0.0 {
                return ExprValue::Null;
            }
            a % b
        }
    };
    match result_type {
        ExprType::Float => ExprValue::Float(result as f32),
        _ => ExprValue::Double(result),
    }
}
