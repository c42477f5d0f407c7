//! Typed double-dispatch traversal over logical plans.

use crate::planner::logical::{
    Aggregate, Filter, Join, Limit, Project, Relation, Rename, Sort,
};

/// One operation per plan variant. Downstream passes (validation,
/// rewriting, physical translation) are implemented as visitors, never by
/// extending the plan nodes themselves. Every method is required, so
/// adding a plan variant breaks every visitor at compile time instead of
/// at runtime.
///
/// `R` is the traversal result, `C` an arbitrary caller-supplied context
/// threaded through `LogicalPlan::accept`.
pub trait PlanVisitor<R, C> {
    fn visit_relation(&mut self, node: &Relation, context: &mut C) -> R;
    fn visit_filter(&mut self, node: &Filter, context: &mut C) -> R;
    fn visit_project(&mut self, node: &Project, context: &mut C) -> R;
    fn visit_aggregate(&mut self, node: &Aggregate, context: &mut C) -> R;
    fn visit_join(&mut self, node: &Join, context: &mut C) -> R;
    fn visit_sort(&mut self, node: &Sort, context: &mut C) -> R;
    fn visit_limit(&mut self, node: &Limit, context: &mut C) -> R;
    fn visit_rename(&mut self, node: &Rename, context: &mut C) -> R;
}
