//! Process-wide lookup tables.
//!
//! The field-type registry, the relation map, the locales and the admin base
//! URL are assembled once at startup into a [`FormConfig`], which every
//! [`Form`](crate::form::Form) shares through an `Arc`. Nothing mutates them
//! while requests are handled; a new configuration means a new `FormConfig`.
//!
//! # Examples
//!
//! ```
//! use ignite_rs_core::Settings;
//! use ignite_rs_crud::registry::FormConfig;
//!
//! let config = FormConfig::from_settings(&Settings::default()).shared();
//! assert!(config.fields().contains("modal"));
//! assert_eq!(config.base_url(), "http://localhost/admin");
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use ignite_rs_core::{IgniteError, IgniteResult, Settings};
use ignite_rs_db::RelationKind;

use crate::field_type::FieldType;
use crate::fields::{
    Block, Boolean, Component, Modal, MorphTo, MorphToRegistrar, Password, RelationField, Text,
    Textarea,
};
use crate::form::Form;

/// A user-registered form method that registers fields under the given id.
pub type FormExtension = Arc<dyn Fn(&mut Form, &str) -> IgniteResult<()> + Send + Sync>;

/// Maps short tags (`text`, `modal`, ...) to field types.
#[derive(Clone, Default)]
pub struct FieldRegistry {
    types: IndexMap<String, Arc<dyn FieldType>>,
    extensions: IndexMap<String, FormExtension>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in field type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(Text)
            .register(Textarea)
            .register(Boolean)
            .register(Password)
            .register(Modal)
            .register(Block)
            .register(Component)
            .register(MorphTo)
            .register(MorphToRegistrar);
        for relation in RelationField::ALL {
            registry.register(relation);
        }
        registry
    }

    /// Registers a field type under its own name, replacing any previous one.
    pub fn register(&mut self, kind: impl FieldType + 'static) -> &mut Self {
        let kind: Arc<dyn FieldType> = Arc::new(kind);
        self.register_as(kind.name(), kind)
    }

    /// Registers a field type under `tag`.
    pub fn register_as(&mut self, tag: impl Into<String>, kind: Arc<dyn FieldType>) -> &mut Self {
        self.types.insert(tag.into(), kind);
        self
    }

    /// Registers a form extension method.
    pub fn extend<F>(&mut self, name: impl Into<String>, extension: F) -> &mut Self
    where
        F: Fn(&mut Form, &str) -> IgniteResult<()> + Send + Sync + 'static,
    {
        self.extensions.insert(name.into(), Arc::new(extension));
        self
    }

    /// Returns the field type registered under `tag`.
    pub fn get(&self, tag: &str) -> Option<Arc<dyn FieldType>> {
        self.types.get(tag).cloned()
    }

    /// Returns `true` if a field type is registered under `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.types.contains_key(tag)
    }

    /// Returns the extension registered under `name`.
    pub fn extension(&self, name: &str) -> Option<FormExtension> {
        self.extensions.get(name).cloned()
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Maps relation kinds to the field types representing them.
#[derive(Debug, Clone)]
pub struct RelationMap {
    map: IndexMap<RelationKind, Arc<dyn FieldType>>,
}

impl Default for RelationMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.insert(RelationKind::BelongsToMany, RelationField::BELONGS_TO_MANY)
            .insert(RelationKind::BelongsTo, RelationField::BELONGS_TO)
            .insert(RelationKind::MorphOne, RelationField::MORPH_ONE)
            .insert(RelationKind::MorphTo, MorphToRegistrar)
            .insert(RelationKind::MorphToMany, RelationField::MORPH_TO_MANY)
            .insert(RelationKind::MorphMany, RelationField::MORPH_MANY)
            .insert(RelationKind::HasMany, RelationField::HAS_MANY)
            .insert(RelationKind::HasOne, RelationField::HAS_ONE);
        map
    }
}

impl RelationMap {
    /// Creates a map supporting no relation kind.
    pub fn empty() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }

    /// Maps `kind` to `field_type`.
    pub fn insert(&mut self, kind: RelationKind, field_type: impl FieldType + 'static) -> &mut Self {
        self.map.insert(kind, Arc::new(field_type));
        self
    }

    /// Returns the field type for `kind`.
    pub fn get(&self, kind: RelationKind) -> Option<Arc<dyn FieldType>> {
        self.map.get(&kind).cloned()
    }

    /// Returns the names of every supported kind, in mapping order.
    pub fn supported(&self) -> Vec<&'static str> {
        self.map.keys().map(|kind| kind.name()).collect()
    }

    /// Returns the field type for `kind`, or fails listing the supported kinds.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::InvalidConfiguration`] for unmapped kinds.
    pub fn resolve(&self, kind: RelationKind) -> IgniteResult<Arc<dyn FieldType>> {
        self.get(kind).ok_or_else(|| {
            IgniteError::InvalidConfiguration(format!(
                "Relation {kind} not supported. Supported relations: {}",
                self.supported().join(", ")
            ))
        })
    }
}

/// Everything a form reads from startup configuration.
#[derive(Debug, Clone)]
pub struct FormConfig {
    fields: FieldRegistry,
    relations: RelationMap,
    locales: Vec<String>,
    base_url: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl FormConfig {
    /// Builds the configuration from settings, with the built-in field types
    /// and relation map.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            fields: FieldRegistry::with_defaults(),
            relations: RelationMap::default(),
            locales: settings.locales().to_vec(),
            base_url: settings.url(""),
        }
    }

    /// Replaces the field-type registry.
    #[must_use]
    pub fn with_fields(mut self, fields: FieldRegistry) -> Self {
        self.fields = fields;
        self
    }

    /// Replaces the relation map.
    #[must_use]
    pub fn with_relations(mut self, relations: RelationMap) -> Self {
        self.relations = relations;
        self
    }

    /// Replaces the locales.
    #[must_use]
    pub fn with_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locales = locales.into_iter().map(Into::into).collect();
        self
    }

    /// Freezes the configuration for sharing between forms.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Returns the field-type registry.
    pub const fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    /// Returns the relation map.
    pub const fn relations(&self) -> &RelationMap {
        &self.relations
    }

    /// Returns the locales translatable fields expand into.
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Returns the admin base URL stripped from route prefixes.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = FieldRegistry::with_defaults();
        for tag in [
            "text",
            "textarea",
            "boolean",
            "password",
            "modal",
            "block",
            "component",
            "morphTo",
            "morphToRegistrar",
            "belongsTo",
            "belongsToMany",
            "hasOne",
            "hasMany",
            "morphOne",
            "morphMany",
            "morphToMany",
        ] {
            assert!(registry.contains(tag), "{tag} is not registered");
        }
        assert!(!registry.contains("wysiwyg"));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = FieldRegistry::with_defaults();
        registry.register_as("text", Arc::new(Textarea));
        assert_eq!(registry.get("text").unwrap().name(), "textarea");
    }

    #[test]
    fn test_relation_map_order_and_error() {
        let map = RelationMap::default();
        assert_eq!(
            map.supported(),
            vec![
                "belongsToMany",
                "belongsTo",
                "morphOne",
                "morphTo",
                "morphToMany",
                "morphMany",
                "hasMany",
                "hasOne"
            ]
        );
        assert_eq!(
            map.resolve(RelationKind::MorphTo).unwrap().name(),
            "morphToRegistrar"
        );

        let err = map.resolve(RelationKind::HasManyThrough).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Relation hasManyThrough not supported. Supported relations: \
             belongsToMany, belongsTo, morphOne, morphTo, morphToMany, morphMany, hasMany, hasOne"
        );
    }

    #[test]
    fn test_config_from_settings() {
        let mut settings = Settings::default();
        settings.translatable.locales = vec!["en".to_string(), "de".to_string()];
        settings.app_url = "https://shop.test".to_string();
        let config = FormConfig::from_settings(&settings);
        assert_eq!(config.locales(), ["en".to_string(), "de".to_string()]);
        assert_eq!(config.base_url(), "https://shop.test/admin");
    }

    #[test]
    fn test_with_locales() {
        let config = FormConfig::default().with_locales(["fr"]);
        assert_eq!(config.locales(), ["fr".to_string()]);
    }
}
