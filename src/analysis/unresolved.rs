//! The untyped tree handed over by the external parser.
//!
//! This is a data format, not a grammar: the parser (or any other
//! front end) serializes its output into these shapes and the analyzer
//! takes it from there. Join types arrive as plain tags and are only
//! validated during plan construction.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// An expression before name and type binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum UnresolvedExpression {
    /// Literal constant, carried as raw JSON
    Literal { value: JsonValue },

    /// Field reference by name
    Field { name: String },

    /// Function call by name, to be resolved against the catalog
    Call {
        name: String,
        args: Vec<UnresolvedExpression>,
    },
}

/// One projection output with an optional alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedProjection {
    pub expr: UnresolvedExpression,
    #[serde(default)]
    pub alias: Option<String>,
}

/// One aggregator application. `argument` is absent for `count(*)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedAggregatorCall {
    pub function: String,
    #[serde(default)]
    pub argument: Option<UnresolvedExpression>,
    #[serde(default)]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedSortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedSortKey {
    pub expr: UnresolvedExpression,
    #[serde(default)]
    pub order: UnresolvedSortOrder,
}

/// A plan tree before binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum UnresolvedPlan {
    Relation {
        name: String,
    },
    Filter {
        input: Box<UnresolvedPlan>,
        condition: UnresolvedExpression,
    },
    Project {
        input: Box<UnresolvedPlan>,
        projections: Vec<UnresolvedProjection>,
    },
    Aggregate {
        input: Box<UnresolvedPlan>,
        #[serde(default)]
        aggregators: Vec<UnresolvedAggregatorCall>,
        #[serde(default)]
        groups: Vec<UnresolvedExpression>,
    },
    Join {
        left: Box<UnresolvedPlan>,
        right: Box<UnresolvedPlan>,
        join_type: String,
        join_fields: Vec<String>,
    },
    Sort {
        input: Box<UnresolvedPlan>,
        keys: Vec<UnresolvedSortKey>,
    },
    Limit {
        input: Box<UnresolvedPlan>,
        limit: u64,
        #[serde(default)]
        offset: u64,
    },
    Rename {
        input: Box<UnresolvedPlan>,
        mapping: Vec<(String, String)>,
    },
}
