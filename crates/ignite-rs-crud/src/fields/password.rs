//! Password inputs.

use serde_json::{json, Value};

use crate::field_type::{Capability, DefaultValue, FieldType};

fn default_confirm() -> Value {
    json!(false)
}

const PASSWORD_DEFAULTS: &[(&str, DefaultValue)] = &[("confirm", default_confirm)];

/// A password input.
///
/// The stored value is never sent to the frontend. In confirm mode the field
/// only asks for the current password before a sensitive action; its value is
/// neither filled into the model nor saved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Password;

impl FieldType for Password {
    fn name(&self) -> &'static str {
        "password"
    }

    fn component(&self) -> &'static str {
        "ignite-field-password"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Rules]
    }

    fn methods(&self) -> &'static [&'static str] {
        &["confirm"]
    }

    fn defaults(&self) -> &'static [(&'static str, DefaultValue)] {
        PASSWORD_DEFAULTS
    }

    fn cast(&self, _value: Value) -> Value {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_value_is_hidden() {
        assert_eq!(Password.cast(json!("$2y$10$hash")), Value::Null);
    }

    #[test]
    fn test_confirm_method() {
        assert!(Password.has_method("confirm"));
        assert!(Password.has_method("rules"));
        assert!(!Password.has_method("placeholder"));
    }
}
