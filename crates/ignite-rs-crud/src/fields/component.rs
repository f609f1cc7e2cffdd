//! Arbitrary frontend components placed between fields.

use crate::field::Field;
use crate::field_type::FieldType;

/// A pure UI element rendering the frontend component named by its id.
///
/// Components have no model value: they are skipped by
/// [`Form::find_field`](crate::form::Form::find_field) and never filled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Component;

impl FieldType for Component {
    fn name(&self) -> &'static str {
        "component"
    }

    fn component(&self) -> &'static str {
        "ignite-component"
    }

    fn is_component(&self) -> bool {
        true
    }

    fn mount(&self, field: &mut Field) {
        let name = field.id().to_string();
        field.set_attribute("component", name).set_fill(false).set_save(false);
    }
}
