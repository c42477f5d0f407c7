//! Plan rendering, one indented line per node.

use crate::planner::logical::{
    Aggregate, Filter, Join, Limit, LogicalPlan, Project, Relation, Rename, Sort,
};
use crate::planner::visitor::PlanVisitor;

/// Render a plan tree as indented text, root first.
pub fn explain(plan: &LogicalPlan) -> String {
    let mut explainer = Explainer { lines: Vec::new() };
    let mut depth = 0usize;
    plan.accept(&mut explainer, &mut depth);
    explainer.lines.join("\n")
}

struct Explainer {
    lines: Vec<String>,
}

impl Explainer {
    fn line(&mut self, depth: usize, text: String) {
        self.lines.push(format!("{}{}", "  ".repeat(depth), text));
    }

    fn child(&mut self, node: &LogicalPlan, depth: &mut usize) {
        *depth += 1;
        node.accept(self, depth);
        *depth -= 1;
    }

    fn comma_joined<T: ToString>(items: &[T]) -> String {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PlanVisitor<(), usize> for Explainer {
    fn visit_relation(&mut self, node: &Relation, context: &mut usize) {
        self.line(*context, format!("Relation: {}", node.relation_name));
    }

    fn visit_filter(&mut self, node: &Filter, context: &mut usize) {
        self.line(*context, format!("Filter: {}", node.condition));
        self.child(&node.input, context);
    }

    fn visit_project(&mut self, node: &Project, context: &mut usize) {
        self.line(
            *context,
            format!("Project: [{}]", Self::comma_joined(&node.projections)),
        );
        self.child(&node.input, context);
    }

    fn visit_aggregate(&mut self, node: &Aggregate, context: &mut usize) {
        self.line(
            *context,
            format!(
                "Aggregate: [{}], groups = [{}]",
                Self::comma_joined(&node.aggregators),
                Self::comma_joined(&node.groups)
            ),
        );
        self.child(&node.input, context);
    }

    fn visit_join(&mut self, node: &Join, context: &mut usize) {
        self.line(
            *context,
            format!(
                "Join: {} on [{}]",
                node.join_type.as_str(),
                node.join_fields.join(", ")
            ),
        );
        self.child(&node.left, context);
        self.child(&node.right, context);
    }

    fn visit_sort(&mut self, node: &Sort, context: &mut usize) {
        let keys: Vec<String> = node
            .sort_keys
            .iter()
            .map(|key| format!("{} {}", key.expr, key.order.as_str()))
            .collect();
        self.line(*context, format!("Sort: [{}]", keys.join(", ")));
        self.child(&node.input, context);
    }

    fn visit_limit(&mut self, node: &Limit, context: &mut usize) {
        self.line(
            *context,
            format!("Limit: {}, offset = {}", node.limit, node.offset),
        );
        self.child(&node.input, context);
    }

    fn visit_rename(&mut self, node: &Rename, context: &mut usize) {
        let pairs: Vec<String> = node
            .mapping
            .iter()
            .map(|(from, to)| format!("{} -> {}", from, to))
            .collect();
        self.line(*context, format!("Rename: [{}]", pairs.join(", ")));
        self.child(&node.input, context);
    }
}
