//! Logical plan nodes.

use crate::expression::{Aggregator, Expression, NamedExpression};
use crate::planner::visitor::PlanVisitor;
use crate::planner::MalformedPlanError;
use std::fmt;

/// Scan of one backend relation (index). Leaf node.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub relation_name: String,
}

/// Keep the rows satisfying a predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub input: Box<LogicalPlan>,
    pub condition: Expression,
}

/// Compute named output expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub input: Box<LogicalPlan>,
    pub projections: Vec<NamedExpression>,
}

/// One named aggregator application, e.g. `avg(age) AS avg_age`.
/// `argument` is None for `count(*)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedAggregatorCall {
    pub name: String,
    pub aggregator: Aggregator,
    pub argument: Option<Expression>,
}

impl fmt::Display for NamedAggregatorCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = match &self.argument {
            Some(argument) => format!("{}({})", self.aggregator.name(), argument),
            None => format!("{}(*)", self.aggregator.name()),
        };
        if rendered == self.name {
            write!(f, "{}", rendered)
        } else {
            write!(f, "{} AS {}", rendered, self.name)
        }
    }
}

/// Group rows and accumulate aggregates per group.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub input: Box<LogicalPlan>,
    pub aggregators: Vec<NamedAggregatorCall>,
    pub groups: Vec<Expression>,
}

/// The recognized join variants. Always explicit, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    /// Parse a join-type tag handed over by the parser.
    pub fn parse(tag: &str) -> Result<Self, MalformedPlanError> {
        match tag.to_lowercase().as_str() {
            "inner" => Ok(JoinType::Inner),
            "left" => Ok(JoinType::Left),
            "right" => Ok(JoinType::Right),
            "full" => Ok(JoinType::Full),
            "cross" => Ok(JoinType::Cross),
            _ => Err(MalformedPlanError::UnrecognizedJoinType(tag.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
            JoinType::Right => "right",
            JoinType::Full => "full",
            JoinType::Cross => "cross",
        }
    }
}

/// Join two inputs on named fields. Exactly two children.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub left: Box<LogicalPlan>,
    pub right: Box<LogicalPlan>,
    pub join_type: JoinType,
    pub join_fields: Vec<String>,
}

/// Sort direction for one sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub expr: Expression,
    pub order: SortOrder,
}

/// Order rows by a list of keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub input: Box<LogicalPlan>,
    pub sort_keys: Vec<SortKey>,
}

/// Keep at most `limit` rows after skipping `offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub input: Box<LogicalPlan>,
    pub limit: u64,
    pub offset: u64,
}

/// Rename output fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Rename {
    pub input: Box<LogicalPlan>,
    pub mapping: Vec<(String, String)>,
}

/// A logical plan tree. Each node owns its children exclusively and is
/// never mutated after construction; transformation passes produce a new
/// tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalPlan {
    Relation(Relation),
    Filter(Filter),
    Project(Project),
    Aggregate(Aggregate),
    Join(Join),
    Sort(Sort),
    Limit(Limit),
    Rename(Rename),
}

impl LogicalPlan {
    /// Leaf scan of a named relation.
    pub fn relation(relation_name: impl Into<String>) -> Self {
        LogicalPlan::Relation(Relation {
            relation_name: relation_name.into(),
        })
    }

    pub fn filter(self, condition: Expression) -> Self {
        LogicalPlan::Filter(Filter {
            input: Box::new(self),
            condition,
        })
    }

    pub fn project(self, projections: Vec<NamedExpression>) -> Self {
        LogicalPlan::Project(Project {
            input: Box::new(self),
            projections,
        })
    }

    pub fn aggregate(
        self,
        aggregators: Vec<NamedAggregatorCall>,
        groups: Vec<Expression>,
    ) -> Self {
        LogicalPlan::Aggregate(Aggregate {
            input: Box::new(self),
            aggregators,
            groups,
        })
    }

    /// Join construction validates its structural invariants up front:
    /// the type tag must name a recognized variant and the field list
    /// must be non-empty (a cross join still names the correlation
    /// fields it produces).
    pub fn join(
        left: LogicalPlan,
        right: LogicalPlan,
        join_type: &str,
        join_fields: Vec<String>,
    ) -> Result<Self, MalformedPlanError> {
        let join_type = JoinType::parse(join_type)?;
        if join_fields.is_empty() {
            return Err(MalformedPlanError::EmptyJoinFields);
        }
        Ok(LogicalPlan::Join(Join {
            left: Box::new(left),
            right: Box::new(right),
            join_type,
            join_fields,
        }))
    }

    pub fn sort(self, sort_keys: Vec<SortKey>) -> Self {
        LogicalPlan::Sort(Sort {
            input: Box::new(self),
            sort_keys,
        })
    }

    pub fn limit(self, limit: u64, offset: u64) -> Self {
        LogicalPlan::Limit(Limit {
            input: Box::new(self),
            limit,
            offset,
        })
    }

    pub fn rename(self, mapping: Vec<(String, String)>) -> Self {
        LogicalPlan::Rename(Rename {
            input: Box::new(self),
            mapping,
        })
    }

    /// The children of this node, exactly as many as the variant declares.
    pub fn children(&self) -> Vec<&LogicalPlan> {
        match self {
            LogicalPlan::Relation(_) => vec![],
            LogicalPlan::Filter(node) => vec![&node.input],
            LogicalPlan::Project(node) => vec![&node.input],
            LogicalPlan::Aggregate(node) => vec![&node.input],
            LogicalPlan::Join(node) => vec![&node.left, &node.right],
            LogicalPlan::Sort(node) => vec![&node.input],
            LogicalPlan::Limit(node) => vec![&node.input],
            LogicalPlan::Rename(node) => vec![&node.input],
        }
    }

    /// Double dispatch into the visitor operation matching this variant.
    pub fn accept<R, C, V>(&self, visitor: &mut V, context: &mut C) -> R
    where
        V: PlanVisitor<R, C>,
    {
        match self {
            LogicalPlan::Relation(node) => visitor.visit_relation(node, context),
            LogicalPlan::Filter(node) => visitor.visit_filter(node, context),
            LogicalPlan::Project(node) => visitor.visit_project(node, context),
            LogicalPlan::Aggregate(node) => visitor.visit_aggregate(node, context),
            LogicalPlan::Join(node) => visitor.visit_join(node, context),
            LogicalPlan::Sort(node) => visitor.visit_sort(node, context),
            LogicalPlan::Limit(node) => visitor.visit_limit(node, context),
            LogicalPlan::Rename(node) => visitor.visit_rename(node, context),
        }
    }
}
