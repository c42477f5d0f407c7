//! Logical rewriting pass.
//!
//! Rewrites are implemented as a visitor producing a new tree; the input
//! plan is never touched. Current rules:
//!
//! - adjacent Filter nodes merge into one `and` condition
//! - adjacent Limit nodes collapse to the tighter window

use crate::expression::Expression;
use crate::planner::logical::{
    Aggregate, Filter, Join, Limit, LogicalPlan, Project, Relation, Rename, Sort,
};
use crate::planner::visitor::PlanVisitor;

#[derive(Debug, Default)]
pub struct LogicalOptimizer;

impl LogicalOptimizer {
    pub fn new() -> Self {
        Self
    }

    pub fn optimize(&self, plan: &LogicalPlan) -> LogicalPlan {
        plan.accept(&mut Rewriter, &mut ())
    }
}

struct Rewriter;

impl PlanVisitor<LogicalPlan, ()> for Rewriter {
    fn visit_relation(&mut self, node: &Relation, _context: &mut ()) -> LogicalPlan {
        LogicalPlan::Relation(node.clone())
    }

    fn visit_filter(&mut self, node: &Filter, context: &mut ()) -> LogicalPlan {
        match node.input.accept(self, context) {
            LogicalPlan::Filter(inner) => {
                match Expression::call(
                    "and",
                    vec![inner.condition.clone(), node.condition.clone()],
                ) {
                    Ok(merged) => (*inner.input).filter(merged),
                    // A non-boolean condition cannot merge; keep the nesting
                    Err(_) => LogicalPlan::Filter(Filter {
                        input: Box::new(LogicalPlan::Filter(inner)),
                        condition: node.condition.clone(),
                    }),
                }
            }
            input => input.filter(node.condition.clone()),
        }
    }

    fn visit_project(&mut self, node: &Project, context: &mut ()) -> LogicalPlan {
        node.input
            .accept(self, context)
            .project(node.projections.clone())
    }

    fn visit_aggregate(&mut self, node: &Aggregate, context: &mut ()) -> LogicalPlan {
        node.input
            .accept(self, context)
            .aggregate(node.aggregators.clone(), node.groups.clone())
    }

    fn visit_join(&mut self, node: &Join, context: &mut ()) -> LogicalPlan {
        LogicalPlan::Join(Join {
            left: Box::new(node.left.accept(self, context)),
            right: Box::new(node.right.accept(self, context)),
            join_type: node.join_type,
            join_fields: node.join_fields.clone(),
        })
    }

    fn visit_sort(&mut self, node: &Sort, context: &mut ()) -> LogicalPlan {
        node.input.accept(self, context).sort(node.sort_keys.clone())
    }

    fn visit_limit(&mut self, node: &Limit, context: &mut ()) -> LogicalPlan {
        match node.input.accept(self, context) {
            LogicalPlan::Limit(inner) => {
                // Limit(l2, o2) over Limit(l1, o1) keeps rows o1+o2 up to
                // the tighter of both windows
                let limit = node.limit.min(inner.limit.saturating_sub(node.offset));
                let offset = inner.offset + node.offset;
                (*inner.input).limit(limit, offset)
            }
            input => input.limit(node.limit, node.offset),
        }
    }

    fn visit_rename(&mut self, node: &Rename, context: &mut ()) -> LogicalPlan {
        node.input.accept(self, context).rename(node.mapping.clone())
    }
}
