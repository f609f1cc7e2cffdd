//! Relation field types.
//!
//! One [`RelationField`] constant exists per supported relation kind.
//! `morphTo` relations are special: the candidate model types are only known
//! after the relation was declared, so the form first creates a detached
//! [`MorphToRegistrar`] and turns it into a registered [`MorphTo`] field once
//! the types are given.

use ignite_rs_db::RelationKind;

use crate::field_type::{Capability, FieldType};

/// A field editing a model relation of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationField {
    kind: RelationKind,
    component: &'static str,
}

impl RelationField {
    /// `belongsTo` relations.
    pub const BELONGS_TO: Self = Self::new(RelationKind::BelongsTo, "ignite-field-belongs-to");
    /// `belongsToMany` relations.
    pub const BELONGS_TO_MANY: Self =
        Self::new(RelationKind::BelongsToMany, "ignite-field-belongs-to-many");
    /// `hasOne` relations.
    pub const HAS_ONE: Self = Self::new(RelationKind::HasOne, "ignite-field-has-one");
    /// `hasMany` relations.
    pub const HAS_MANY: Self = Self::new(RelationKind::HasMany, "ignite-field-has-many");
    /// `morphOne` relations.
    pub const MORPH_ONE: Self = Self::new(RelationKind::MorphOne, "ignite-field-morph-one");
    /// `morphMany` relations.
    pub const MORPH_MANY: Self = Self::new(RelationKind::MorphMany, "ignite-field-morph-many");
    /// `morphToMany` relations.
    pub const MORPH_TO_MANY: Self =
        Self::new(RelationKind::MorphToMany, "ignite-field-morph-to-many");

    /// Every built-in relation field type.
    pub const ALL: [Self; 7] = [
        Self::BELONGS_TO,
        Self::BELONGS_TO_MANY,
        Self::HAS_ONE,
        Self::HAS_MANY,
        Self::MORPH_ONE,
        Self::MORPH_MANY,
        Self::MORPH_TO_MANY,
    ];

    /// Creates a relation field type rendered by `component`.
    pub const fn new(kind: RelationKind, component: &'static str) -> Self {
        Self { kind, component }
    }
}

impl FieldType for RelationField {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn component(&self) -> &'static str {
        self.component
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Relation]
    }

    fn relation_kind(&self) -> Option<RelationKind> {
        Some(self.kind)
    }
}

/// A registered `morphTo` field with its candidate model types.
#[derive(Debug, Clone, Copy, Default)]
pub struct MorphTo;

impl FieldType for MorphTo {
    fn name(&self) -> &'static str {
        "morphTo"
    }

    fn component(&self) -> &'static str {
        "ignite-field-morph-to"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Relation]
    }

    fn required_attributes(&self) -> &'static [&'static str] {
        &["types"]
    }

    fn relation_kind(&self) -> Option<RelationKind> {
        Some(RelationKind::MorphTo)
    }
}

/// The detached placeholder a `morphTo` relation starts as.
///
/// Never appended to the form; see
/// [`Form::morph_types`](crate::form::Form::morph_types).
#[derive(Debug, Clone, Copy, Default)]
pub struct MorphToRegistrar;

impl FieldType for MorphToRegistrar {
    fn name(&self) -> &'static str {
        "morphToRegistrar"
    }

    fn component(&self) -> &'static str {
        "ignite-field-morph-to"
    }

    fn should_be_registered(&self) -> bool {
        false
    }

    fn relation_kind(&self) -> Option<RelationKind> {
        Some(RelationKind::MorphTo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_field_names() {
        let names: Vec<&str> = RelationField::ALL.iter().map(|field| field.name()).collect();
        assert_eq!(
            names,
            vec![
                "belongsTo",
                "belongsToMany",
                "hasOne",
                "hasMany",
                "morphOne",
                "morphMany",
                "morphToMany"
            ]
        );
    }

    #[test]
    fn test_relation_fields_require_preview() {
        assert!(RelationField::HAS_MANY.supports(Capability::Relation));
        assert_eq!(
            RelationField::HAS_MANY.relation_kind(),
            Some(RelationKind::HasMany)
        );
    }

    #[test]
    fn test_registrar_is_detached() {
        assert!(!MorphToRegistrar.should_be_registered());
        assert!(MorphTo.should_be_registered());
        assert_eq!(MorphTo.required_attributes(), ["types"]);
    }
}
