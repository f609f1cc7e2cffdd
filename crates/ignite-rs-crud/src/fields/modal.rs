//! Buttons opening a modal with a nested form.

use serde_json::{json, Value};

use crate::field_type::{Capability, DefaultValue, FieldType};

fn default_size() -> Value {
    json!("md")
}

fn default_variant() -> Value {
    json!("secondary")
}

fn default_confirm_with_password() -> Value {
    json!(false)
}

const MODAL_DEFAULTS: &[(&str, DefaultValue)] = &[
    ("size", default_size),
    ("variant", default_variant),
    ("confirmWithPassword", default_confirm_with_password),
];

/// A button opening a modal that contains its own form.
///
/// Requires a `name` and a nested `form`, set through
/// [`FieldBuilder::form`](crate::builder::FieldBuilder::form).
#[derive(Debug, Clone, Copy, Default)]
pub struct Modal;

impl FieldType for Modal {
    fn name(&self) -> &'static str {
        "modal"
    }

    fn component(&self) -> &'static str {
        "ignite-field-modal"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Form]
    }

    fn methods(&self) -> &'static [&'static str] {
        &["name", "size", "variant", "confirm_with_password", "preview"]
    }

    fn required_attributes(&self) -> &'static [&'static str] {
        &["name", "form"]
    }

    fn defaults(&self) -> &'static [(&'static str, DefaultValue)] {
        MODAL_DEFAULTS
    }

    fn slots(&self) -> &'static [&'static str] {
        &["button"]
    }
}
