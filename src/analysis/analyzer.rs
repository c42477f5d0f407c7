//! Binding of unresolved trees into typed logical plans.

use crate::analysis::schema::Schema;
use crate::analysis::unresolved::{
    UnresolvedAggregatorCall, UnresolvedExpression, UnresolvedPlan, UnresolvedSortOrder,
};
use crate::analysis::AnalysisError;
use crate::data::row;
use crate::expression::{Aggregator, Expression, NamedExpression};
use crate::planner::{LogicalPlan, NamedAggregatorCall, SortKey, SortOrder};

/// Analyzes one query at a time; holds only the schema and is freely
/// reusable across queries.
pub struct Analyzer {
    schema: Schema,
}

impl Analyzer {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Bind an unresolved plan bottom-up into a typed logical plan.
    pub fn analyze(&self, plan: &UnresolvedPlan) -> Result<LogicalPlan, AnalysisError> {
        match plan {
            UnresolvedPlan::Relation { name } => {
                log::debug!("binding relation {}", name);
                Ok(LogicalPlan::relation(name.clone()))
            }
            UnresolvedPlan::Filter { input, condition } => {
                let input = self.analyze(input)?;
                let condition = self.analyze_expression(condition)?;
                Ok(input.filter(condition))
            }
            UnresolvedPlan::Project { input, projections } => {
                let input = self.analyze(input)?;
                let projections = projections
                    .iter()
                    .map(|projection| {
                        let expr = self.analyze_expression(&projection.expr)?;
                        let name = projection
                            .alias
                            .clone()
                            .unwrap_or_else(|| expr.to_string());
                        Ok(NamedExpression::new(name, expr))
                    })
                    .collect::<Result<Vec<_>, AnalysisError>>()?;
                Ok(input.project(projections))
            }
            UnresolvedPlan::Aggregate {
                input,
                aggregators,
                groups,
            } => {
                let input = self.analyze(input)?;
                let aggregators = aggregators
                    .iter()
                    .map(|call| self.analyze_aggregator(call))
                    .collect::<Result<Vec<_>, AnalysisError>>()?;
                let groups = groups
                    .iter()
                    .map(|group| self.analyze_expression(group))
                    .collect::<Result<Vec<_>, AnalysisError>>()?;
                Ok(input.aggregate(aggregators, groups))
            }
            UnresolvedPlan::Join {
                left,
                right,
                join_type,
                join_fields,
            } => {
                let left = self.analyze(left)?;
                let right = self.analyze(right)?;
                Ok(LogicalPlan::join(
                    left,
                    right,
                    join_type,
                    join_fields.clone(),
                )?)
            }
            UnresolvedPlan::Sort { input, keys } => {
                let input = self.analyze(input)?;
                let sort_keys = keys
                    .iter()
                    .map(|key| {
                        let expr = self.analyze_expression(&key.expr)?;
                        let order = match key.order {
                            UnresolvedSortOrder::Asc => SortOrder::Asc,
                            UnresolvedSortOrder::Desc => SortOrder::Desc,
                        };
                        Ok(SortKey { expr, order })
                    })
                    .collect::<Result<Vec<_>, AnalysisError>>()?;
                Ok(input.sort(sort_keys))
            }
            UnresolvedPlan::Limit {
                input,
                limit,
                offset,
            } => {
                let input = self.analyze(input)?;
                Ok(input.limit(*limit, *offset))
            }
            UnresolvedPlan::Rename { input, mapping } => {
                let input = self.analyze(input)?;
                Ok(input.rename(mapping.clone()))
            }
        }
    }

    /// Bind one expression: literals convert to values, field references
    /// pick up their schema type, calls resolve against the catalog.
    pub fn analyze_expression(
        &self,
        expr: &UnresolvedExpression,
    ) -> Result<Expression, AnalysisError> {
        match expr {
            UnresolvedExpression::Literal { value } => {
                Ok(Expression::literal(row::from_json(value)))
            }
            UnresolvedExpression::Field { name } => Ok(Expression::field(
                name.clone(),
                self.schema.field_type(name),
            )),
            UnresolvedExpression::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.analyze_expression(arg))
                    .collect::<Result<Vec<_>, AnalysisError>>()?;
                Ok(Expression::call(name, args)?)
            }
        }
    }

    fn analyze_aggregator(
        &self,
        call: &UnresolvedAggregatorCall,
    ) -> Result<NamedAggregatorCall, AnalysisError> {
        let aggregator = Aggregator::of(&call.function)
            .ok_or_else(|| AnalysisError::UnknownAggregator(call.function.clone()))?;
        let argument = call
            .argument
            .as_ref()
            .map(|argument| self.analyze_expression(argument))
            .transpose()?;
        let name = call.alias.clone().unwrap_or_else(|| match &argument {
            Some(argument) => format!("{}({})", aggregator.name(), argument),
            None => format!("{}(*)", aggregator.name()),
        });
        Ok(NamedAggregatorCall {
            name,
            aggregator,
            argument,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ExprType;
    use crate::expression::{ExpressionError, FunctionName};
    use crate::planner::{explain, MalformedPlanError};
    use serde_json::json;

    fn account_schema() -> Schema {
        Schema::new()
            .with_field("age", ExprType::Integer)
            .with_field("name", ExprType::String)
            .with_field("active", ExprType::Boolean)
    }

    fn plan(value: serde_json::Value) -> UnresolvedPlan {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_analyze_filter_project() {
        let analyzer = Analyzer::new(account_schema());
        let unresolved = plan(json!({
            "op": "project",
            "projections": [
                {"expr": {"expr": "field", "name": "name"}},
                {"expr": {"expr": "call", "name": "+",
                          "args": [{"expr": "field", "name": "age"},
                                   {"expr": "literal", "value": 1}]},
                 "alias": "age_next"}
            ],
            "input": {
                "op": "filter",
                "condition": {"expr": "call", "name": ">",
                              "args": [{"expr": "field", "name": "age"},
                                       {"expr": "literal", "value": 18}]},
                "input": {"op": "relation", "name": "accounts"}
            }
        }));

        let logical = analyzer.analyze(&unresolved).unwrap();
        assert_eq!(
            explain(&logical),
            "Project: [name, +(age, 1) AS age_next]\n  Filter: >(age, 18)\n    Relation: accounts"
        );
    }

    #[test]
    fn test_field_types_come_from_schema() {
        let analyzer = Analyzer::new(account_schema());
        let expr = analyzer
            .analyze_expression(&UnresolvedExpression::Field {
                name: "age".to_string(),
            })
            .unwrap();
        assert_eq!(expr.type_of(), ExprType::Integer);

        // Unmapped fields defer typing
        let expr = analyzer
            .analyze_expression(&UnresolvedExpression::Field {
                name: "salary".to_string(),
            })
            .unwrap();
        assert_eq!(expr.type_of(), ExprType::Unknown);
    }

    #[test]
    fn test_unknown_function_surfaces() {
        let analyzer = Analyzer::new(account_schema());
        let unresolved = plan(json!({
            "op": "filter",
            "condition": {"expr": "call", "name": "frobnicate", "args": []},
            "input": {"op": "relation", "name": "accounts"}
        }));

        let err = analyzer.analyze(&unresolved).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Expression(ExpressionError::UnknownFunction(FunctionName::of(
                "frobnicate"
            )))
        );
    }

    #[test]
    fn test_type_mismatch_surfaces() {
        let analyzer = Analyzer::new(account_schema());
        let unresolved = plan(json!({
            "op": "filter",
            "condition": {"expr": "call", "name": "+",
                          "args": [{"expr": "field", "name": "name"},
                                   {"expr": "literal", "value": 1}]},
            "input": {"op": "relation", "name": "accounts"}
        }));

        let err = analyzer.analyze(&unresolved).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Expression(ExpressionError::NoMatchingSignature { .. })
        ));
    }

    #[test]
    fn test_malformed_join_surfaces() {
        let analyzer = Analyzer::new(account_schema());
        let unresolved = plan(json!({
            "op": "join",
            "join_type": "sideways",
            "join_fields": ["id"],
            "left": {"op": "relation", "name": "a"},
            "right": {"op": "relation", "name": "b"}
        }));
        let err = analyzer.analyze(&unresolved).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Plan(MalformedPlanError::UnrecognizedJoinType(
                "sideways".to_string()
            ))
        );

        let unresolved = plan(json!({
            "op": "join",
            "join_type": "inner",
            "join_fields": [],
            "left": {"op": "relation", "name": "a"},
            "right": {"op": "relation", "name": "b"}
        }));
        let err = analyzer.analyze(&unresolved).unwrap_err();
        assert_eq!(err, AnalysisError::Plan(MalformedPlanError::EmptyJoinFields));
    }

    #[test]
    fn test_analyze_aggregate() {
        let analyzer = Analyzer::new(account_schema());
        let unresolved = plan(json!({
            "op": "aggregate",
            "aggregators": [
                {"function": "count"},
                {"function": "avg",
                 "argument": {"expr": "field", "name": "age"},
                 "alias": "avg_age"}
            ],
            "groups": [{"expr": "field", "name": "active"}],
            "input": {"op": "relation", "name": "accounts"}
        }));

        let logical = analyzer.analyze(&unresolved).unwrap();
        assert_eq!(
            explain(&logical),
            "Aggregate: [count(*), avg(age) AS avg_age], groups = [active]\n  Relation: accounts"
        );
    }

    #[test]
    fn test_unknown_aggregator_surfaces() {
        let analyzer = Analyzer::new(account_schema());
        let unresolved = plan(json!({
            "op": "aggregate",
            "aggregators": [{"function": "median",
                             "argument": {"expr": "field", "name": "age"}}],
            "input": {"op": "relation", "name": "accounts"}
        }));

        let err = analyzer.analyze(&unresolved).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownAggregator("median".to_string()));
    }

    #[test]
    fn test_analyze_sort_and_rename() {
        let analyzer = Analyzer::new(account_schema());
        let unresolved = plan(json!({
            "op": "rename",
            "mapping": [["name", "account_name"]],
            "input": {
                "op": "sort",
                "keys": [{"expr": {"expr": "field", "name": "age"}, "order": "desc"}],
                "input": {"op": "relation", "name": "accounts"}
            }
        }));

        let logical = analyzer.analyze(&unresolved).unwrap();
        assert_eq!(
            explain(&logical),
            "Rename: [name -> account_name]\n  Sort: [age desc]\n    Relation: accounts"
        );
    }
}
