//! Repeatable content blocks.

use indexmap::IndexMap;

use crate::attributes::Attribute;
use crate::field::Field;
use crate::field_type::{Capability, FieldType};

/// A list of content blocks, each built from one of several named
/// repeatable forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Block;

impl FieldType for Block {
    fn name(&self) -> &'static str {
        "block"
    }

    fn component(&self) -> &'static str {
        "ignite-field-block"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Repeatables]
    }

    fn methods(&self) -> &'static [&'static str] {
        &["block_width"]
    }

    fn mount(&self, field: &mut Field) {
        field.insert_attribute("repeatables", Attribute::Forms(IndexMap::new()));
    }
}
