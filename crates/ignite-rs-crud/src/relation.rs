//! Relation resolution.
//!
//! `Form::relation("comments")` needs to know which kind of relation the
//! bound model's `comments` accessor returns. The resolver instantiates a
//! throwaway model through its [`ModelType`], asks it for the relation, and
//! maps the relation kind to a field type through the
//! [`RelationMap`](crate::registry::RelationMap).
//!
//! Models that don't expose their relations can still be used with
//! [`resolve_declared`], where the caller states the relation explicitly.

use std::sync::Arc;

use ignite_rs_core::{IgniteError, IgniteResult};
use ignite_rs_db::{ModelType, Relation};

use crate::field_type::FieldType;
use crate::registry::RelationMap;

/// A relation together with the field type representing it.
#[derive(Debug, Clone)]
pub struct ResolvedRelation {
    /// The relation descriptor returned by the model.
    pub relation: Relation,
    /// The field type to construct.
    pub field_type: Arc<dyn FieldType>,
}

/// Fails for the internal form model, which has no relation accessors.
///
/// # Errors
///
/// Returns [`IgniteError::InvalidConfiguration`] for the internal model.
pub fn ensure_relations_available(model: ModelType) -> IgniteResult<()> {
    if model.is_form_model() {
        return Err(IgniteError::InvalidConfiguration(
            "Model relations are not available in standalone forms. Use the dedicated relation \
             fields instead."
                .to_string(),
        ));
    }
    Ok(())
}

/// Resolves the relation accessor `name` on `model`.
///
/// # Errors
///
/// Returns [`IgniteError::InvalidConfiguration`] when the model is the
/// internal form model, has no accessor called `name`, or returns a
/// relation kind `relations` does not map.
pub fn resolve(model: ModelType, name: &str, relations: &RelationMap) -> IgniteResult<ResolvedRelation> {
    ensure_relations_available(model)?;

    let relation = model.instantiate().relation(name).ok_or_else(|| {
        IgniteError::InvalidConfiguration(format!(
            "Relation [{name}] does not exist on model [{}]",
            model.name()
        ))
    })?;

    tracing::debug!(model = model.name(), name, kind = %relation.kind, "resolved relation");
    resolve_declared(model, relation, relations)
}

/// Maps an explicitly declared relation to its field type.
///
/// # Errors
///
/// Returns [`IgniteError::InvalidConfiguration`] for the internal form model
/// and for unmapped relation kinds.
pub fn resolve_declared(
    model: ModelType,
    relation: Relation,
    relations: &RelationMap,
) -> IgniteResult<ResolvedRelation> {
    ensure_relations_available(model)?;
    let field_type = relations.resolve(relation.kind)?;
    Ok(ResolvedRelation {
        relation,
        field_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignite_rs_db::{Model, RelationKind};

    #[derive(Default)]
    struct Post;

    impl Model for Post {
        fn model_name(&self) -> &'static str {
            "post"
        }

        fn relation(&self, name: &str) -> Option<Relation> {
            match name {
                "comments" => Some(Relation::has_many("comment")),
                "tags" => Some(Relation::new(RelationKind::MorphedByMany, "tag")),
                _ => None,
            }
        }
    }

    #[test]
    fn test_resolve_has_many() {
        let resolved =
            resolve(ModelType::of::<Post>(), "comments", &RelationMap::default()).unwrap();
        assert_eq!(resolved.relation.kind, RelationKind::HasMany);
        assert_eq!(resolved.field_type.name(), "hasMany");
    }

    #[test]
    fn test_unsupported_kind_lists_supported() {
        let err = resolve(ModelType::of::<Post>(), "tags", &RelationMap::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("morphedByMany not supported"));
        assert!(message.contains("belongsToMany, belongsTo, morphOne"));
    }

    #[test]
    fn test_missing_accessor() {
        let err = resolve(ModelType::of::<Post>(), "author", &RelationMap::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Relation [author] does not exist on model [post]"
        );
    }

    #[test]
    fn test_form_model_is_refused() {
        let err = resolve(ModelType::form_model(), "comments", &RelationMap::default()).unwrap_err();
        assert!(matches!(err, IgniteError::InvalidConfiguration(_)));

        let declared = resolve_declared(
            ModelType::form_model(),
            Relation::has_many("comment"),
            &RelationMap::default(),
        );
        assert!(declared.is_err());
    }

    #[test]
    fn test_resolve_declared() {
        let resolved = resolve_declared(
            ModelType::of::<Post>(),
            Relation::belongs_to("user"),
            &RelationMap::default(),
        )
        .unwrap();
        assert_eq!(resolved.field_type.name(), "belongsTo");
        assert_eq!(resolved.relation.related, "user");
    }
}
