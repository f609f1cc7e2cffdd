//! Forms.
//!
//! A [`Form`] is an ordered registry of [`Field`]s for one model resource.
//! Each request builds its own form by re-running the declarative
//! registration calls, renders it, and drops it; only the [`FormConfig`] is
//! shared.
//!
//! # Examples
//!
//! ```
//! use ignite_rs_crud::form::Form;
//! use ignite_rs_crud::registry::FormConfig;
//! use ignite_rs_db::ModelType;
//!
//! # fn main() -> ignite_rs_core::IgniteResult<()> {
//! let mut form = Form::new(ModelType::form_model(), FormConfig::default().shared());
//! form.text("title")?.rules(["required"])?;
//! form.boolean("published")?;
//! form.textarea("summary")?.when("published", true)?;
//!
//! let rendered = form.render()?;
//! assert_eq!(rendered["fields"][2]["dependencies"][0]["attribute"], "published");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Value};

use ignite_rs_core::{IgniteError, IgniteResult};
use ignite_rs_db::{ModelType, Relation};

use crate::auth::AdminUser;
use crate::builder::FieldBuilder;
use crate::field::{Field, RuleType, Rules};
use crate::field_type::{Capability, FieldType};
use crate::fields::MorphToRegistrar;
use crate::registry::FormConfig;
use crate::relation::{self, ResolvedRelation};

/// A hook run on every field a form registers.
pub type FieldHook = Arc<dyn Fn(&mut Field) + Send + Sync>;

/// Where a constructed field lives inside its form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Appended to the field list.
    Registered(usize),
    /// Constructed but not registrable (e.g. a `morphTo` registrar).
    Detached(usize),
}

/// An ordered registry of fields bound to one model.
pub struct Form {
    model: ModelType,
    config: Arc<FormConfig>,
    route_prefix: Option<String>,
    fields: Vec<Field>,
    detached: Vec<Field>,
    registrar: Option<Slot>,
    registering: Vec<FieldHook>,
    registered: Vec<FieldHook>,
    page: serde_json::Map<String, Value>,
}

impl Form {
    /// Creates an empty form bound to `model`.
    pub fn new(model: ModelType, config: Arc<FormConfig>) -> Self {
        Self {
            model,
            config,
            route_prefix: None,
            fields: Vec::new(),
            detached: Vec::new(),
            registrar: None,
            registering: Vec::new(),
            registered: Vec::new(),
            page: serde_json::Map::new(),
        }
    }

    /// Creates an empty form sharing this form's model and configuration.
    pub(crate) fn nested(&self, route_prefix: String) -> Self {
        let mut form = Self::new(self.model, Arc::clone(&self.config));
        form.route_prefix = Some(route_prefix);
        form
    }

    /// Returns the bound model.
    pub const fn model(&self) -> ModelType {
        self.model
    }

    /// Returns the shared configuration.
    pub fn config(&self) -> &Arc<FormConfig> {
        &self.config
    }

    /// Returns the route prefix new fields are constructed with.
    pub fn route_prefix(&self) -> Option<&str> {
        self.route_prefix.as_deref()
    }

    /// Sets the route prefix, stripping the admin base URL when present.
    pub fn set_route_prefix(&mut self, route_prefix: &str) -> &mut Self {
        let stripped = route_prefix
            .strip_prefix(self.config.base_url())
            .unwrap_or(route_prefix)
            .trim_matches('/');
        self.route_prefix = Some(stripped.to_string());
        self
    }

    /// Adds a hook run on every field before it is registered.
    pub fn registering<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut Field) + Send + Sync + 'static,
    {
        self.registering.push(Arc::new(hook));
        self
    }

    /// Adds a hook run on every field after it was registered.
    pub fn registered<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut Field) + Send + Sync + 'static,
    {
        self.registered.push(Arc::new(hook));
        self
    }

    /// Sets a page attribute rendered next to the fields.
    pub fn page_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.page.insert(key.into(), value.into());
        self
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Constructs a field of type `kind` and registers it.
    ///
    /// # Errors
    ///
    /// Fails when the field cannot be constructed (e.g. the `media` id).
    pub fn register_field(
        &mut self,
        kind: Arc<dyn FieldType>,
        id: &str,
    ) -> IgniteResult<FieldBuilder<'_>> {
        let field = Field::new(kind, id, self.model, self.route_prefix.as_deref())?;
        Ok(self.register_instance(field))
    }

    /// Registers an already constructed field.
    ///
    /// Runs the `registering` hooks, makes the field the current registrar,
    /// appends it to the field list if its type is registrable, then runs
    /// the `registered` hooks.
    pub fn register_instance(&mut self, mut field: Field) -> FieldBuilder<'_> {
        for hook in &self.registering {
            hook(&mut field);
        }

        let slot = if field.should_be_registered() {
            self.fields.push(field);
            Slot::Registered(self.fields.len() - 1)
        } else {
            self.detached.push(field);
            Slot::Detached(self.detached.len() - 1)
        };
        self.registrar = Some(slot);

        let field = match slot {
            Slot::Registered(index) => &mut self.fields[index],
            Slot::Detached(index) => &mut self.detached[index],
        };
        for hook in &self.registered {
            hook(field);
        }
        tracing::debug!(
            model = self.model.name(),
            field_type = field.type_name(),
            id = field.id(),
            registered = matches!(slot, Slot::Registered(_)),
            "registered field"
        );

        FieldBuilder::new(self, slot)
    }

    /// Registers a field of the type registered under `tag`.
    ///
    /// Falls back to a form extension named `tag`, which must register a
    /// field itself.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::UndefinedOperation`] when neither a field
    /// type nor an extension is registered under `tag`.
    pub fn add_field(&mut self, tag: &str, id: &str) -> IgniteResult<FieldBuilder<'_>> {
        if let Some(kind) = self.config.fields().get(tag) {
            return self.register_field(kind, id);
        }

        let Some(extension) = self.config.fields().extension(tag) else {
            return Err(IgniteError::undefined("Form", tag));
        };
        let before = self.registrar;
        extension(self, id)?;
        let after = self.registrar;
        match after {
            Some(slot) if after != before => Ok(FieldBuilder::new(self, slot)),
            _ => Err(IgniteError::InvalidConfiguration(format!(
                "Extension [{tag}] did not register a field"
            ))),
        }
    }

    /// Registers a field for the relation accessor `name` of the bound model.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::InvalidConfiguration`] for the internal form
    /// model, unknown accessors and unsupported relation kinds.
    pub fn relation(&mut self, name: &str) -> IgniteResult<FieldBuilder<'_>> {
        let resolved = relation::resolve(self.model, name, self.config.relations())?;
        self.register_relation(name, resolved)
    }

    /// Registers a field for an explicitly declared relation.
    ///
    /// # Errors
    ///
    /// Fails like [`relation`](Self::relation), minus the accessor lookup.
    pub fn relation_as(&mut self, name: &str, relation: Relation) -> IgniteResult<FieldBuilder<'_>> {
        let resolved = relation::resolve_declared(self.model, relation, self.config.relations())?;
        self.register_relation(name, resolved)
    }

    fn register_relation(
        &mut self,
        name: &str,
        resolved: ResolvedRelation,
    ) -> IgniteResult<FieldBuilder<'_>> {
        let ResolvedRelation {
            relation,
            field_type,
        } = resolved;
        let mut field = Field::new(field_type, name, self.model, self.route_prefix.as_deref())?;
        field
            .set_attribute("relation_name", name)
            .set_attribute("related", relation.related);
        if let Some(foreign_key) = relation.foreign_key {
            field.set_attribute("foreign_key", foreign_key);
        }
        Ok(self.register_instance(field))
    }

    /// Turns the current `morphTo` registrar into a registered `morphTo`
    /// field accepting the given model types.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::InvalidConfiguration`] unless the most
    /// recently declared field is a `morphTo` relation.
    pub fn morph_types(&mut self, types: &[ModelType]) -> IgniteResult<FieldBuilder<'_>> {
        let Some(Slot::Detached(index)) = self.registrar else {
            return Err(morph_registrar_missing());
        };
        let registrar = &self.detached[index];
        if registrar.type_name() != MorphToRegistrar.name() {
            return Err(morph_registrar_missing());
        }
        let id = registrar.id().to_string();

        let kind = self.config.fields().get("morphTo").ok_or_else(|| {
            IgniteError::InvalidConfiguration("Field type [morphTo] is not registered".to_string())
        })?;
        let names: Vec<&str> = types.iter().map(ModelType::name).collect();
        let mut field = Field::new(kind, &id, self.model, self.route_prefix.as_deref())?;
        field
            .set_attribute("relation_name", id.as_str())
            .set_attribute("types", json!(names));
        // The registrar is always the most recent detached field.
        self.detached.remove(index);
        Ok(self.register_instance(field))
    }

    // ── Lookup ───────────────────────────────────────────────────────

    pub(crate) fn field_at(&self, slot: Slot) -> &Field {
        match slot {
            Slot::Registered(index) => &self.fields[index],
            Slot::Detached(index) => &self.detached[index],
        }
    }

    pub(crate) fn field_at_mut(&mut self, slot: Slot) -> &mut Field {
        match slot {
            Slot::Registered(index) => &mut self.fields[index],
            Slot::Detached(index) => &mut self.detached[index],
        }
    }

    /// Returns the most recently constructed field, registered or not.
    pub fn registrar(&self) -> Option<&Field> {
        self.registrar.map(|slot| self.field_at(slot))
    }

    /// Returns the registered fields in registration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the registered fields mutably.
    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    /// Finds a registered field by id, skipping pure UI components.
    pub fn find_field(&self, id: &str) -> Option<&Field> {
        self.fields
            .iter()
            .filter(|field| !field.is_component())
            .find(|field| field.id() == id)
    }

    /// Continues configuring a registered field.
    pub fn field(&mut self, id: &str) -> Option<FieldBuilder<'_>> {
        let index = self
            .fields
            .iter()
            .position(|field| !field.is_component() && field.id() == id)?;
        Some(FieldBuilder::new(self, Slot::Registered(index)))
    }

    /// Returns `true` if [`find_field`](Self::find_field) finds `id`.
    pub fn has_field(&self, id: &str) -> bool {
        self.find_field(id).is_some()
    }

    /// Returns `true` if the field `name` carries a nested form.
    ///
    /// Block fields only carry named repeatable forms, so for them
    /// `repeatable` must name one.
    pub fn has_form(&self, name: &str, repeatable: Option<&str>) -> bool {
        self.get_form(name, repeatable).is_some()
    }

    /// Returns the nested form of the field `name`.
    ///
    /// See [`has_form`](Self::has_form) for the role of `repeatable`.
    pub fn get_form(&self, name: &str, repeatable: Option<&str>) -> Option<&Self> {
        let field = self.find_field(name)?;
        if field.supports(Capability::Repeatables) {
            return field.repeatable(repeatable?);
        }
        field.nested_form()
    }

    // ── Rules ────────────────────────────────────────────────────────

    /// Collects the validation rules of every field with the rules
    /// capability, keyed by `local_key`.
    ///
    /// Translatable fields contribute one entry per configured locale, keyed
    /// `<locale>.<local_key>`.
    pub fn get_rules(&self, rule_type: Option<RuleType>) -> IndexMap<String, Rules> {
        let mut rules = IndexMap::new();
        for field in &self.fields {
            let Some(field_rules) = field.get_rules(rule_type) else {
                continue;
            };
            if field.is_translatable() {
                for locale in self.config.locales() {
                    rules.insert(format!("{locale}.{}", field.local_key()), field_rules.clone());
                }
            } else {
                rules.insert(field.local_key().to_string(), field_rules);
            }
        }
        rules
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Checks every registered field for completeness.
    ///
    /// # Errors
    ///
    /// Returns the error of the first incomplete field.
    pub fn check_complete(&self) -> IgniteResult<()> {
        for field in &self.fields {
            if let Err(err) = field.check_complete() {
                tracing::warn!(
                    model = self.model.name(),
                    field = field.id(),
                    error = %err,
                    "incomplete field declaration"
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Serializes the form as `{...page attributes, fields: [...]}`.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::MissingRequiredAttribute`] for the first
    /// incomplete field.
    pub fn render(&self) -> IgniteResult<Value> {
        self.render_fields(|_| true)
    }

    /// Like [`render`](Self::render), but only with the fields `user` is
    /// authorized to see.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render).
    pub fn render_for(&self, user: Option<&AdminUser>) -> IgniteResult<Value> {
        self.render_fields(|field| field.authorized(user))
    }

    fn render_fields(&self, visible: impl Fn(&Field) -> bool) -> IgniteResult<Value> {
        self.check_complete()?;

        let mut map = self.page.clone();
        let fields = self
            .fields
            .iter()
            .filter(|field| visible(field))
            .map(Field::render)
            .collect::<IgniteResult<Vec<_>>>()?;
        map.insert("fields".to_string(), Value::Array(fields));
        Ok(Value::Object(map))
    }
}

fn morph_registrar_missing() -> IgniteError {
    IgniteError::InvalidConfiguration(
        "morph_types must directly follow the declaration of a morphTo relation".to_string(),
    )
}

macro_rules! typed_fields {
    ($($(#[$doc:meta])* $method:ident => $tag:literal,)*) => {
        impl Form {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// Fails when the field cannot be constructed or the tag is
                /// not registered.
                pub fn $method(&mut self, id: &str) -> IgniteResult<FieldBuilder<'_>> {
                    self.add_field($tag, id)
                }
            )*
        }
    };
}

typed_fields! {
    /// Adds a single line text input.
    text => "text",
    /// Adds a multi line text input.
    textarea => "textarea",
    /// Adds a checkbox.
    boolean => "boolean",
    /// Adds a password input.
    password => "password",
    /// Adds a button opening a modal form.
    modal => "modal",
    /// Adds a list of repeatable content blocks.
    block => "block",
    /// Adds the frontend component `id`.
    component => "component",
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("model", &self.model)
            .field("route_prefix", &self.route_prefix)
            .field("fields", &self.fields)
            .field("detached", &self.detached)
            .field("registrar", &self.registrar)
            .field("hooks", &(self.registering.len(), self.registered.len()))
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldRegistry;

    fn form() -> Form {
        Form::new(ModelType::form_model(), FormConfig::default().shared())
    }

    #[test]
    fn test_register_in_order() {
        let mut form = form();
        form.text("title").unwrap();
        form.textarea("body").unwrap();
        form.boolean("published").unwrap();
        let ids: Vec<&str> = form.fields().iter().map(Field::id).collect();
        assert_eq!(ids, vec!["title", "body", "published"]);
        assert_eq!(form.registrar().unwrap().id(), "published");
    }

    #[test]
    fn test_unknown_tag_is_undefined() {
        let mut form = form();
        let err = form.add_field("wysiwyg", "body").unwrap_err();
        assert_eq!(err.to_string(), "Call to undefined method Form::wysiwyg()");
    }

    #[test]
    fn test_media_is_rejected_through_form() {
        let mut form = form();
        assert!(form.text("media").is_err());
        assert!(form.fields().is_empty());
    }

    #[test]
    fn test_find_field_skips_components() {
        let mut form = form();
        form.component("info-box").unwrap();
        form.text("title").unwrap();
        assert!(form.find_field("info-box").is_none());
        assert_eq!(form.fields().len(), 2);
        assert_eq!(form.find_field("title").unwrap().id(), "title");
        assert!(!form.has_field("missing"));
    }

    #[test]
    fn test_hooks_run_around_registration() {
        let mut form = form();
        form.registering(|field| {
            field.set_attribute("seen_before", true);
        });
        form.registered(|field| {
            let before = field.value("seen_before").cloned();
            field.set_attribute("seen_after", before.unwrap_or(Value::Null));
        });
        form.text("title").unwrap();
        let field = form.find_field("title").unwrap();
        assert_eq!(field.value("seen_before"), Some(&json!(true)));
        assert_eq!(field.value("seen_after"), Some(&json!(true)));
    }

    #[test]
    fn test_route_prefix_is_normalized() {
        let mut form = form();
        form.set_route_prefix("http://localhost/admin/crud/posts");
        assert_eq!(form.route_prefix(), Some("crud/posts"));
        form.set_route_prefix("crud/pages/");
        assert_eq!(form.route_prefix(), Some("crud/pages"));

        form.text("title").unwrap();
        assert_eq!(form.fields()[0].route_prefix(), Some("crud/pages"));
    }

    #[test]
    fn test_render_surfaces_first_incomplete_field() {
        let mut form = form();
        form.text("title").unwrap();
        form.modal("first").unwrap();
        form.modal("second").unwrap();
        let err = form.render().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required attributes: [name, form] for modal field \"first\""
        );
    }

    #[test]
    fn test_page_attributes_are_rendered() {
        let mut form = form();
        form.page_attribute("title", "Settings");
        form.text("title").unwrap();
        let rendered = form.render().unwrap();
        let keys: Vec<&str> = rendered.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "fields"]);
    }

    #[test]
    fn test_render_for_filters_unauthorized() {
        let mut form = form();
        form.text("title").unwrap();
        form.text("secret")
            .unwrap()
            .authorize(|user| user.is_some_and(|u| u.has_role("admin")));
        let admin = AdminUser::new(1, "Ada").with_role("admin");

        assert_eq!(form.render_for(None).unwrap()["fields"].as_array().unwrap().len(), 1);
        assert_eq!(
            form.render_for(Some(&admin)).unwrap()["fields"].as_array().unwrap().len(),
            2
        );
    }

    #[test]
    fn test_extension_registers_fields() {
        let mut fields = FieldRegistry::with_defaults();
        fields.extend("seo", |form, id| {
            form.text(&format!("{id}_title"))?;
            form.textarea(&format!("{id}_description"))?;
            Ok(())
        });
        fields.extend("noop", |_, _| Ok(()));
        let config = FormConfig::default().with_fields(fields).shared();
        let mut form = Form::new(ModelType::form_model(), config);

        let builder = form.add_field("seo", "meta").unwrap();
        assert_eq!(builder.id(), "meta_description");
        assert_eq!(form.fields().len(), 2);

        let err = form.add_field("noop", "x").unwrap_err();
        assert!(err.to_string().contains("Extension [noop]"));
    }

    #[test]
    fn test_relation_on_form_model_is_refused() {
        let mut form = form();
        let err = form.relation("comments").unwrap_err();
        assert!(matches!(err, IgniteError::InvalidConfiguration(_)));
    }

    #[derive(Default)]
    struct Comment;

    impl ignite_rs_db::Model for Comment {
        fn model_name(&self) -> &'static str {
            "comment"
        }
    }

    #[test]
    fn test_morph_types_replaces_registrar() {
        let mut form = Form::new(ModelType::of::<Comment>(), FormConfig::default().shared());
        form.relation_as("commentable", Relation::morph_to()).unwrap();
        assert_eq!(form.detached.len(), 1);

        form.morph_types(&[ModelType::of::<Comment>()]).unwrap();
        assert!(form.detached.is_empty());
        assert_eq!(form.registrar, Some(Slot::Registered(0)));
        assert_eq!(form.registrar().unwrap().type_name(), "morphTo");
        assert!(form.morph_types(&[]).is_err());
    }

    #[test]
    fn test_morph_types_without_registrar() {
        let mut form = form();
        form.text("title").unwrap();
        assert!(form.morph_types(&[]).is_err());
    }
}
