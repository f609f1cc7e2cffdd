//! Field types and capabilities.
//!
//! A [`FieldType`] describes one kind of form control (`text`, `modal`,
//! `hasMany`, ...). It declares, statically:
//!
//! - the frontend component rendering it,
//! - an ordered table of default attribute values, evaluated once when a
//!   field of the type is constructed,
//! - the attributes a field must carry before it can be rendered,
//! - the [`Capability`] sets it mixes in, each contributing its own builder
//!   methods and required attributes,
//! - the value conversions between storage and presentation.
//!
//! Field types are stateless and shared between every form through the
//! [`FieldRegistry`](crate::registry::FieldRegistry).

use std::fmt;

use serde_json::Value;

use ignite_rs_db::RelationKind;

use crate::field::Field;

/// Produces a default attribute value.
pub type DefaultValue = fn() -> Value;

/// A reusable set of builder methods a field type can mix in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Validation rules for the request validator.
    Rules,
    /// One value per configured locale.
    Translatable,
    /// Placeholder text.
    Placeholder,
    /// A single nested form.
    Form,
    /// Named nested forms, one per repeatable block type.
    Repeatables,
    /// A model relation with a preview table.
    Relation,
}

impl Capability {
    /// Returns the attributes this capability requires on a field.
    pub const fn required_attributes(self) -> &'static [&'static str] {
        match self {
            Self::Form => &["form"],
            Self::Relation => &["preview"],
            Self::Rules | Self::Translatable | Self::Placeholder | Self::Repeatables => &[],
        }
    }

    /// Returns the builder methods this capability provides.
    pub const fn methods(self) -> &'static [&'static str] {
        match self {
            Self::Rules => &["rules", "creation_rules", "update_rules"],
            Self::Translatable => &["translatable"],
            Self::Placeholder => &["placeholder"],
            Self::Form => &["form"],
            Self::Repeatables => &["repeatable"],
            Self::Relation => &["preview"],
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A kind of form field.
///
/// Only [`name`](Self::name) and [`component`](Self::component) are
/// mandatory; everything else has a neutral default.
///
/// # Examples
///
/// ```
/// use ignite_rs_crud::field_type::{Capability, DefaultValue, FieldType};
///
/// #[derive(Debug)]
/// struct Color;
///
/// fn default_format() -> serde_json::Value {
///     serde_json::json!("hex")
/// }
///
/// const DEFAULTS: &[(&str, DefaultValue)] = &[("format", default_format)];
///
/// impl FieldType for Color {
///     fn name(&self) -> &'static str { "color" }
///     fn component(&self) -> &'static str { "ignite-field-color" }
///     fn capabilities(&self) -> &'static [Capability] { &[Capability::Rules] }
///     fn defaults(&self) -> &'static [(&'static str, DefaultValue)] {
///         DEFAULTS
///     }
/// }
///
/// assert_eq!(Color.name(), "color");
/// ```
pub trait FieldType: fmt::Debug + Send + Sync {
    /// The short tag the type is registered under (e.g. `text`).
    fn name(&self) -> &'static str;

    /// The frontend component rendering fields of this type.
    fn component(&self) -> &'static str;

    /// The capability sets this type mixes in.
    fn capabilities(&self) -> &'static [Capability] {
        &[]
    }

    /// Builder methods specific to this type, beyond its capabilities.
    fn methods(&self) -> &'static [&'static str] {
        &[]
    }

    /// Attributes a field of this type must carry, beyond its capabilities'.
    fn required_attributes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Default attribute values, applied in order at construction.
    fn defaults(&self) -> &'static [(&'static str, DefaultValue)] {
        &[]
    }

    /// Imperative defaults, run after the [`defaults`](Self::defaults) table.
    fn mount(&self, field: &mut Field) {
        let _ = field;
    }

    /// The slots a field of this type accepts.
    fn slots(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether fields of this type are appended to the form's field list.
    fn should_be_registered(&self) -> bool {
        true
    }

    /// Whether this type is a pure UI component without a model value.
    fn is_component(&self) -> bool {
        false
    }

    /// The relation kind, for relation field types.
    fn relation_kind(&self) -> Option<RelationKind> {
        None
    }

    /// Converts a stored model value into the field's value.
    fn cast(&self, value: Value) -> Value {
        value
    }

    /// Converts a submitted value before it is persisted.
    fn format(&self, value: Value) -> Value {
        value
    }

    /// Reshapes a value for display only.
    fn transform(&self, value: Value) -> Value {
        value
    }

    /// Returns `true` if the type or one of its capabilities provides `method`.
    fn has_method(&self, method: &str) -> bool {
        self.methods().contains(&method)
            || self
                .capabilities()
                .iter()
                .any(|capability| capability.methods().contains(&method))
    }

    /// Returns `true` if the type mixes in `capability`.
    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}
