//! Error types for function resolution.

use crate::data::ExprType;
use crate::expression::function::FunctionName;
use thiserror::Error;

/// Errors raised while binding function calls. All of these surface at
/// analysis time; evaluating an already-resolved expression never fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("unknown function: {0}")]
    UnknownFunction(FunctionName),

    #[error("no matching signature for {name}({arg_types:?})")]
    NoMatchingSignature {
        name: FunctionName,
        arg_types: Vec<ExprType>,
    },

    #[error("ambiguous call to {name}({arg_types:?}): multiple signatures match at equal cost")]
    AmbiguousFunction {
        name: FunctionName,
        arg_types: Vec<ExprType>,
    },
}

/// Result type for function resolution
pub type ExpressionResult<T> = Result<T, ExpressionError>;
