//! Checkbox toggles.

use serde_json::Value;

use crate::field_type::{Capability, FieldType};

/// A checkbox whose value is always a `bool`.
///
/// Stored values such as `1`, `"1"`, `"true"` or `"on"` are cast to `true`;
/// everything else, including `null`, to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl Boolean {
    fn to_bool(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > f64::EPSILON),
            Value::String(s) => matches!(s.to_lowercase().as_str(), "1" | "true" | "on" | "yes"),
            Value::Null | Value::Array(_) | Value::Object(_) => false,
        }
    }
}

impl FieldType for Boolean {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn component(&self) -> &'static str {
        "ignite-field-boolean"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Rules]
    }

    fn cast(&self, value: Value) -> Value {
        Value::Bool(Self::to_bool(&value))
    }

    fn format(&self, value: Value) -> Value {
        Value::Bool(Self::to_bool(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cast() {
        for truthy in [json!(true), json!(1), json!("1"), json!("on"), json!("TRUE")] {
            assert_eq!(Boolean.cast(truthy), json!(true));
        }
        for falsy in [json!(false), json!(0), json!("0"), json!(""), Value::Null, json!([])] {
            assert_eq!(Boolean.cast(falsy), json!(false));
        }
    }

    #[test]
    fn test_format_matches_cast() {
        assert_eq!(Boolean.format(json!("yes")), json!(true));
        assert_eq!(Boolean.format(json!(0.0)), json!(false));
    }
}
