//! Name and type binding.
//!
//! The external parser hands over an untyped tree; analysis binds field
//! references against the index schema and function calls against the
//! built-in catalog, producing a typed logical plan. Every error a query
//! can raise in this core surfaces here, at analysis time.

pub mod analyzer;
pub mod schema;
pub mod unresolved;

pub use analyzer::Analyzer;
pub use schema::Schema;
pub use unresolved::{
    UnresolvedAggregatorCall, UnresolvedExpression, UnresolvedPlan, UnresolvedProjection,
    UnresolvedSortKey, UnresolvedSortOrder,
};

use crate::expression::ExpressionError;
use crate::planner::MalformedPlanError;
use thiserror::Error;

/// The outcome of failing to compile one query. Carries the offending
/// name, types, or node so the caller can render a precise diagnostic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Plan(#[from] MalformedPlanError),

    #[error("unknown aggregate function: {0}")]
    UnknownAggregator(String),
}
