//! Binding of backend row documents to expression values.
//!
//! The backend hands the core one JSON document per row. The binding
//! contract is strict: a field absent from the document binds to MISSING,
//! a field present with a JSON `null` binds to NULL. Everything else
//! converts to a concrete value, refined by the field's declared type
//! when the index mapping supplies one.

use crate::data::{ExprType, ExprValue};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value as JsonValue;

/// One backend row, opaque beyond "field name to raw value or absence".
#[derive(Debug, Clone, Default)]
pub struct Row {
    document: serde_json::Map<String, JsonValue>,
}

impl Row {
    /// Wrap a backend document. A non-object value binds every field as
    /// MISSING.
    pub fn new(document: JsonValue) -> Self {
        match document {
            JsonValue::Object(map) => Self { document: map },
            _ => Self::empty(),
        }
    }

    pub fn empty() -> Self {
        Self {
            document: serde_json::Map::new(),
        }
    }

    /// Bind a field without a declared type.
    pub fn resolve(&self, field: &str) -> ExprValue {
        self.resolve_as(field, ExprType::Unknown)
    }

    /// Bind a field, refining the raw value into the declared type from
    /// the index mapping. Absent field -> MISSING, JSON null -> NULL.
    pub fn resolve_as(&self, field: &str, field_type: ExprType) -> ExprValue {
        match self.document.get(field) {
            None => ExprValue::Missing,
            Some(JsonValue::Null) => ExprValue::Null,
            Some(raw) => from_json_typed(raw, field_type),
        }
    }
}

/// Convert a raw JSON value with no declared type: integral numbers become
/// `Long`, fractional numbers `Double`.
pub fn from_json(raw: &JsonValue) -> ExprValue {
    match raw {
        JsonValue::Null => ExprValue::Null,
        JsonValue::Bool(b) => ExprValue::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(v) => ExprValue::Long(v),
            None => ExprValue::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => ExprValue::string(s.clone()),
        JsonValue::Array(items) => ExprValue::Array(items.iter().map(from_json).collect()),
        JsonValue::Object(fields) => ExprValue::Struct(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), from_json(value)))
                .collect(),
        ),
    }
}

/// Convert a raw JSON value into the declared field type. A raw value the
/// declared type cannot represent binds to NULL: the field exists but
/// holds nothing usable.
fn from_json_typed(raw: &JsonValue, field_type: ExprType) -> ExprValue {
    match field_type {
        ExprType::Unknown => from_json(raw),
        ExprType::Boolean => match raw.as_bool() {
            Some(b) => ExprValue::Boolean(b),
            None => ExprValue::Null,
        },
        ExprType::Short => match raw.as_i64().and_then(|v| i16::try_from(v).ok()) {
            Some(v) => ExprValue::Short(v),
            None => ExprValue::Null,
        },
        ExprType::Integer => match raw.as_i64().and_then(|v| i32::try_from(v).ok()) {
            Some(v) => ExprValue::Integer(v),
            None => ExprValue::Null,
        },
        ExprType::Long => match raw.as_i64() {
            Some(v) => ExprValue::Long(v),
            None => ExprValue::Null,
        },
        ExprType::Float => match raw.as_f64() {
            Some(v) => ExprValue::Float(v as f32),
            None => ExprValue::Null,
        },
        ExprType::Double => match raw.as_f64() {
            Some(v) => ExprValue::Double(v),
            None => ExprValue::Null,
        },
        ExprType::String => match raw.as_str() {
            Some(s) => ExprValue::string(s),
            None => ExprValue::Null,
        },
        ExprType::Date => match raw.as_str().and_then(|s| s.parse::<NaiveDate>().ok()) {
            Some(d) => ExprValue::Date(d),
            None => ExprValue::Null,
        },
        ExprType::Time => match raw.as_str().and_then(|s| s.parse::<NaiveTime>().ok()) {
            Some(t) => ExprValue::Time(t),
            None => ExprValue::Null,
        },
        ExprType::Timestamp => match raw
            .as_str()
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
        {
            Some(ts) => ExprValue::Timestamp(ts),
            None => ExprValue::Null,
        },
        ExprType::Array => match raw {
            JsonValue::Array(items) => ExprValue::Array(items.iter().map(from_json).collect()),
            _ => ExprValue::Null,
        },
        ExprType::Struct => match raw {
            JsonValue::Object(fields) => ExprValue::Struct(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), from_json(value)))
                    .collect(),
            ),
            _ => ExprValue::Null,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_field_binds_missing() {
        let row = Row::new(json!({"age": 30}));
        assert_eq!(row.resolve("name"), ExprValue::Missing);
        assert_eq!(row.resolve_as("name", ExprType::String), ExprValue::Missing);
    }

    #[test]
    fn test_null_field_binds_null() {
        let row = Row::new(json!({"age": null}));
        assert_eq!(row.resolve("age"), ExprValue::Null);
        assert_eq!(row.resolve_as("age", ExprType::Integer), ExprValue::Null);
    }

    #[test]
    fn test_untyped_binding() {
        let row = Row::new(json!({
            "age": 30,
            "balance": 2.5,
            "name": "amber",
            "active": true,
            "tags": ["a", "b"],
            "address": {"city": "seattle"}
        }));
        assert_eq!(row.resolve("age"), ExprValue::Long(30));
        assert_eq!(row.resolve("balance"), ExprValue::Double(2.5));
        assert_eq!(row.resolve("name"), ExprValue::string("amber"));
        assert_eq!(row.resolve("active"), ExprValue::Boolean(true));
        assert_eq!(
            row.resolve("tags"),
            ExprValue::Array(vec![ExprValue::string("a"), ExprValue::string("b")])
        );
        assert_eq!(
            row.resolve("address"),
            ExprValue::Struct(vec![("city".to_string(), ExprValue::string("seattle"))])
        );
    }

    #[test]
    fn test_typed_binding() {
        let row = Row::new(json!({
            "age": 30,
            "birthday": "1990-04-01",
            "checkin": "09:30:00",
            "seen": "2020-01-02 10:20:30"
        }));
        assert_eq!(row.resolve_as("age", ExprType::Integer), ExprValue::Integer(30));
        assert_eq!(row.resolve_as("age", ExprType::Double), ExprValue::Double(30.0));
        assert_eq!(
            row.resolve_as("birthday", ExprType::Date),
            ExprValue::Date(NaiveDate::from_ymd_opt(1990, 4, 1).unwrap())
        );
        assert_eq!(
            row.resolve_as("checkin", ExprType::Time),
            ExprValue::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
        );
        assert_eq!(
            row.resolve_as("seen", ExprType::Timestamp),
            ExprValue::Timestamp(
                NaiveDate::from_ymd_opt(2020, 1, 2)
                    .unwrap()
                    .and_hms_opt(10, 20, 30)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_unrepresentable_value_binds_null() {
        let row = Row::new(json!({"age": "not a number", "birthday": "04/01/1990"}));
        assert_eq!(row.resolve_as("age", ExprType::Integer), ExprValue::Null);
        assert_eq!(row.resolve_as("birthday", ExprType::Date), ExprValue::Null);
    }

    #[test]
    fn test_non_object_document() {
        let row = Row::new(json!([1, 2, 3]));
        assert_eq!(row.resolve("anything"), ExprValue::Missing);
    }
}
