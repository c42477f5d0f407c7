//! Index schema consumed by the analyzer.

use crate::data::ExprType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field-to-type mapping loaded from index metadata by the surrounding
/// layer. Fields the mapping does not know type as `Unknown`, deferring
/// to overload resolution the same way a literal NULL does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: HashMap<String, ExprType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, field_type: ExprType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    pub fn field_type(&self, name: &str) -> ExprType {
        self.fields.get(name).copied().unwrap_or(ExprType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_fields() {
        let schema = Schema::new()
            .with_field("age", ExprType::Integer)
            .with_field("name", ExprType::String);

        assert_eq!(schema.field_type("age"), ExprType::Integer);
        assert_eq!(schema.field_type("name"), ExprType::String);
        assert_eq!(schema.field_type("salary"), ExprType::Unknown);
    }

    #[test]
    fn test_load_from_json() {
        let schema: Schema =
            serde_json::from_str(r#"{"age": "integer", "birthday": "date"}"#).unwrap();
        assert_eq!(schema.field_type("age"), ExprType::Integer);
        assert_eq!(schema.field_type("birthday"), ExprType::Date);
    }
}
