//! Single and multi line text inputs.

use serde_json::{json, Value};

use crate::field_type::{Capability, DefaultValue, FieldType};

const TEXT_CAPABILITIES: &[Capability] = &[
    Capability::Rules,
    Capability::Translatable,
    Capability::Placeholder,
];

/// A single line text input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl FieldType for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn component(&self) -> &'static str {
        "ignite-field-text"
    }

    fn capabilities(&self) -> &'static [Capability] {
        TEXT_CAPABILITIES
    }

    fn methods(&self) -> &'static [&'static str] {
        &["max", "type"]
    }

    fn slots(&self) -> &'static [&'static str] {
        &["prepend", "append"]
    }
}

fn default_max_rows() -> Value {
    json!(10)
}

const TEXTAREA_DEFAULTS: &[(&str, DefaultValue)] = &[("maxRows", default_max_rows)];

/// A multi line text input that grows up to `maxRows` rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Textarea;

impl FieldType for Textarea {
    fn name(&self) -> &'static str {
        "textarea"
    }

    fn component(&self) -> &'static str {
        "ignite-field-textarea"
    }

    fn capabilities(&self) -> &'static [Capability] {
        TEXT_CAPABILITIES
    }

    fn methods(&self) -> &'static [&'static str] {
        &["max", "max_rows"]
    }

    fn defaults(&self) -> &'static [(&'static str, DefaultValue)] {
        TEXTAREA_DEFAULTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_methods() {
        assert!(Text.has_method("placeholder"));
        assert!(Text.has_method("translatable"));
        assert!(Text.has_method("max"));
        assert!(!Text.has_method("max_rows"));
    }

    #[test]
    fn test_textarea_defaults() {
        let defaults = Textarea.defaults();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].0, "maxRows");
        assert_eq!((defaults[0].1)(), json!(10));
    }
}
