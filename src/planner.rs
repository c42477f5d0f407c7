//! Logical query plan representation.
//!
//! Logical plans are immutable, backend-independent trees describing the
//! relational operations a query requests. Construction is bottom-up and
//! validates structural invariants; traversal goes through the typed
//! visitor, which is the single extension point for validation, rewriting
//! and physical translation passes.

pub mod explain;
pub mod logical;
pub mod optimizer;
pub mod visitor;

pub use explain::explain;
pub use logical::{
    Aggregate, Filter, Join, JoinType, Limit, LogicalPlan, NamedAggregatorCall, Project, Relation,
    Rename, Sort, SortKey, SortOrder,
};
pub use optimizer::LogicalOptimizer;
pub use visitor::PlanVisitor;

use thiserror::Error;

/// Structural invariant violations caught at plan construction, never
/// during traversal of an already-built tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedPlanError {
    #[error("join requires at least one join field")]
    EmptyJoinFields,

    #[error("unrecognized join type: {0}")]
    UnrecognizedJoinType(String),
}
