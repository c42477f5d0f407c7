//! Core expression types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Types an expression can carry.
///
/// `Unknown` is the placeholder for values whose type cannot yet be
/// determined (a literal NULL, a field absent from the index mapping).
/// It matches any declared parameter type during overload resolution and
/// defers typing to the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprType {
    Unknown,
    Boolean,
    Short,
    Integer,
    Long,
    Float,
    Double,
    String,
    Date,
    Time,
    Timestamp,
    Array,
    Struct,
}

/// All concrete types, i.e. every member except `Unknown`.
pub const CORE_TYPES: [ExprType; 12] = [
    ExprType::Boolean,
    ExprType::Short,
    ExprType::Integer,
    ExprType::Long,
    ExprType::Float,
    ExprType::Double,
    ExprType::String,
    ExprType::Date,
    ExprType::Time,
    ExprType::Timestamp,
    ExprType::Array,
    ExprType::Struct,
];

impl ExprType {
    /// All concrete core types. Per-type function families register one
    /// signature for each of these.
    pub fn core_types() -> &'static [ExprType] {
        &CORE_TYPES
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    /// Position in the widening chain `Short < Integer < Long < Float < Double`.
    fn numeric_rank(&self) -> Option<usize> {
        match self {
            ExprType::Short => Some(0),
            ExprType::Integer => Some(1),
            ExprType::Long => Some(2),
            ExprType::Float => Some(3),
            ExprType::Double => Some(4),
            _ => None,
        }
    }

    /// Number of widening steps needed to convert `from` into `to`.
    ///
    /// Returns None when no widening conversion exists (non-numeric
    /// operands, or a narrowing direction).
    pub fn widening_steps(from: ExprType, to: ExprType) -> Option<usize> {
        let from_rank = from.numeric_rank()?;
        let to_rank = to.numeric_rank()?;
        if from_rank < to_rank {
            Some(to_rank - from_rank)
        } else {
            None
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExprType::Unknown => "unknown",
            ExprType::Boolean => "boolean",
            ExprType::Short => "short",
            ExprType::Integer => "integer",
            ExprType::Long => "long",
            ExprType::Float => "float",
            ExprType::Double => "double",
            ExprType::String => "string",
            ExprType::Date => "date",
            ExprType::Time => "time",
            ExprType::Timestamp => "timestamp",
            ExprType::Array => "array",
            ExprType::Struct => "struct",
        };
        write!(f, "{}", name)
    }
}
