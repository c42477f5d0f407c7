//! Expression values.

use crate::data::ExprType;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Ordering;
use std::fmt;

/// A value produced by binding a row field or evaluating an expression.
///
/// NULL and MISSING are distinct markers: NULL means the field exists but
/// its value is undefined, MISSING means the field does not exist on the
/// current row. Values are immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    Null,
    Missing,
    Boolean(bool),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Array(Vec<ExprValue>),
    Struct(Vec<(String, ExprValue)>),
}

impl ExprValue {
    pub fn string(val: impl Into<String>) -> Self {
        ExprValue::String(val.into())
    }

    /// The type this value carries. The NULL and MISSING markers type as
    /// `Unknown` until context pins them down.
    pub fn type_of(&self) -> ExprType {
        match self {
            ExprValue::Null | ExprValue::Missing => ExprType::Unknown,
            ExprValue::Boolean(_) => ExprType::Boolean,
            ExprValue::Short(_) => ExprType::Short,
            ExprValue::Integer(_) => ExprType::Integer,
            ExprValue::Long(_) => ExprType::Long,
            ExprValue::Float(_) => ExprType::Float,
            ExprValue::Double(_) => ExprType::Double,
            ExprValue::String(_) => ExprType::String,
            ExprValue::Date(_) => ExprType::Date,
            ExprValue::Time(_) => ExprType::Time,
            ExprValue::Timestamp(_) => ExprType::Timestamp,
            ExprValue::Array(_) => ExprType::Array,
            ExprValue::Struct(_) => ExprType::Struct,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ExprValue::Null)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ExprValue::Missing)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExprValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral reading, widening the shorter integer classes.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            ExprValue::Short(v) => Some(i64::from(*v)),
            ExprValue::Integer(v) => Some(i64::from(*v)),
            ExprValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Floating-point reading, widening any numeric class.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            ExprValue::Short(v) => Some(f64::from(*v)),
            ExprValue::Integer(v) => Some(f64::from(*v)),
            ExprValue::Long(v) => Some(*v as f64),
            ExprValue::Float(v) => Some(f64::from(*v)),
            ExprValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExprValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Value ordering for comparison operators. None for the markers and
    /// for pairs with no defined order (arrays, structs, mixed kinds).
    pub fn compare(&self, other: &ExprValue) -> Option<Ordering> {
        match (self, other) {
            (ExprValue::Boolean(a), ExprValue::Boolean(b)) => Some(a.cmp(b)),
            (ExprValue::String(a), ExprValue::String(b)) => Some(a.cmp(b)),
            (ExprValue::Date(a), ExprValue::Date(b)) => Some(a.cmp(b)),
            (ExprValue::Time(a), ExprValue::Time(b)) => Some(a.cmp(b)),
            (ExprValue::Timestamp(a), ExprValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => {
                let a = self.as_double()?;
                let b = other.as_double()?;
                a.partial_cmp(&b)
            }
        }
    }

    /// Value equality across numeric representations: `Integer(2)` and
    /// `Long(2)` hold the same value even though the variants differ.
    pub fn same_value(&self, other: &ExprValue) -> bool {
        match self.compare(other) {
            Some(ordering) => ordering == Ordering::Equal,
            None => self == other && !self.is_null() && !self.is_missing(),
        }
    }
}

impl fmt::Display for ExprValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprValue::Null => write!(f, "NULL"),
            ExprValue::Missing => write!(f, "MISSING"),
            ExprValue::Boolean(v) => write!(f, "{}", v),
            ExprValue::Short(v) => write!(f, "{}", v),
            ExprValue::Integer(v) => write!(f, "{}", v),
            ExprValue::Long(v) => write!(f, "{}", v),
            ExprValue::Float(v) => write!(f, "{}", v),
            ExprValue::Double(v) => write!(f, "{}", v),
            ExprValue::String(v) => write!(f, "\"{}\"", v),
            ExprValue::Date(v) => write!(f, "{}", v),
            ExprValue::Time(v) => write!(f, "{}", v),
            ExprValue::Timestamp(v) => write!(f, "{}", v),
            ExprValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ExprValue::Struct(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
