//! Form fields.
//!
//! A [`Field`] is one declarative form control bound to a model attribute or
//! relation. Its whole configuration lives in an
//! [`AttributeStore`](crate::attributes::AttributeStore); its behavior comes
//! from the shared [`FieldType`] it was constructed from.
//!
//! ## Construction
//!
//! [`Field::new`] performs, in order:
//!
//! 1. rejection of the reserved `media` id,
//! 2. the baseline attributes `id`, `local_key`, `route_prefix`, `component`,
//!    `readonly` and `class`,
//! 3. the field type's [`defaults`](FieldType::defaults) table,
//! 4. the field type's [`mount`](FieldType::mount) hook,
//! 5. merging the required attributes of the type and every capability it
//!    mixes in into one ordered, de-duplicated list.
//!
//! Fields are usually configured through a
//! [`FieldBuilder`](crate::builder::FieldBuilder) obtained from a
//! [`Form`](crate::form::Form), which can validate references to sibling
//! fields. The methods here are the building blocks it uses.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use ignite_rs_core::utils::text::headline;
use ignite_rs_core::{IgniteError, IgniteResult};
use ignite_rs_db::{ModelType, Record, RelationKind};

use crate::attributes::{Attribute, AttributeStore};
use crate::auth::AdminUser;
use crate::dependency::FieldDependency;
use crate::field_type::{Capability, FieldType};
use crate::form::Form;
use crate::media::MEDIA_FIELD_ID;

/// A predicate deciding whether a user may see a field.
pub type AuthorizeFn = Arc<dyn Fn(Option<&AdminUser>) -> bool + Send + Sync>;

/// Which additional rule set to merge into a field's base rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    /// Rules applied when a record is created.
    Creation,
    /// Rules applied when a record is updated.
    Update,
}

impl RuleType {
    const fn attribute(self) -> &'static str {
        match self {
            Self::Creation => "creation_rules",
            Self::Update => "update_rules",
        }
    }
}

/// Validation rules in the shape they were declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Rules {
    /// One rule string, possibly pipe-separated (`"required|max:60"`).
    Single(String),
    /// A list of rules.
    List(Vec<String>),
}

impl Rules {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(rule) => Some(Self::Single(rule.clone())),
            Value::Array(items) => Some(Self::List(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Returns the individual rules; a single rule string is split on `|`.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::Single(rule) => rule
                .split('|')
                .filter(|part| !part.is_empty())
                .map(ToString::to_string)
                .collect(),
            Self::List(rules) => rules.clone(),
        }
    }

    fn merge(self, other: Self) -> Self {
        let mut rules = self.to_vec();
        rules.extend(other.to_vec());
        Self::List(rules)
    }
}

impl From<&str> for Rules {
    fn from(rule: &str) -> Self {
        Self::Single(rule.to_string())
    }
}

impl From<String> for Rules {
    fn from(rule: String) -> Self {
        Self::Single(rule)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Rules {
    fn from(rules: [S; N]) -> Self {
        Self::List(rules.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for Rules {
    fn from(rules: Vec<S>) -> Self {
        Self::List(rules.into_iter().map(Into::into).collect())
    }
}

impl From<Rules> for Value {
    fn from(rules: Rules) -> Self {
        match rules {
            Rules::Single(rule) => Value::String(rule),
            Rules::List(rules) => Value::from(rules),
        }
    }
}

/// A configured form field.
pub struct Field {
    kind: Arc<dyn FieldType>,
    model: ModelType,
    attributes: AttributeStore,
    props: serde_json::Map<String, Value>,
    required: Vec<String>,
    save: bool,
    fill: bool,
    authorize: Option<AuthorizeFn>,
}

impl Field {
    /// Constructs a field of type `kind` bound to `model`.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::InvalidConfiguration`] when `id` is empty or
    /// the reserved `media` id.
    pub fn new(
        kind: Arc<dyn FieldType>,
        id: &str,
        model: ModelType,
        route_prefix: Option<&str>,
    ) -> IgniteResult<Self> {
        if id == MEDIA_FIELD_ID {
            return Err(IgniteError::InvalidConfiguration(format!(
                "Field id [{id}] is reserved for media attachments"
            )));
        }
        if id.is_empty() {
            return Err(IgniteError::InvalidConfiguration(
                "Field id must not be empty".to_string(),
            ));
        }

        let mut field = Self {
            kind: Arc::clone(&kind),
            model,
            attributes: AttributeStore::new(),
            props: serde_json::Map::new(),
            required: Vec::new(),
            save: true,
            fill: true,
            authorize: None,
        };

        field.attributes.set("id", id);
        field.attributes.set("local_key", id);
        field
            .attributes
            .set("route_prefix", route_prefix.map_or(Value::Null, Value::from));
        field.attributes.set("component", kind.component());
        field.attributes.set("readonly", false);
        field.attributes.set("class", "");

        for (name, default) in kind.defaults() {
            field.attributes.set(*name, default());
        }

        kind.mount(&mut field);
        field.merge_required();

        tracing::debug!(field_type = kind.name(), id, "constructed field");
        Ok(field)
    }

    fn merge_required(&mut self) {
        let capabilities = self
            .kind
            .capabilities()
            .iter()
            .flat_map(|capability| capability.required_attributes());
        for name in self.kind.required_attributes().iter().chain(capabilities) {
            if !self.required.iter().any(|r| r == name) {
                self.required.push((*name).to_string());
            }
        }
    }

    // ── Identity ─────────────────────────────────────────────────────

    /// Returns the field id.
    pub fn id(&self) -> &str {
        self.attributes.get_str("id").unwrap_or_default()
    }

    /// Returns the model attribute the field reads and writes.
    pub fn local_key(&self) -> &str {
        self.attributes
            .get_str("local_key")
            .unwrap_or_else(|| self.id())
    }

    /// Returns the route prefix the field was constructed with.
    pub fn route_prefix(&self) -> Option<&str> {
        self.attributes.get_str("route_prefix")
    }

    /// Returns the field type.
    pub fn kind(&self) -> &Arc<dyn FieldType> {
        &self.kind
    }

    /// Returns the short type tag (e.g. `text`).
    pub fn type_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns the model the field is bound to.
    pub const fn model(&self) -> ModelType {
        self.model
    }

    /// Returns the title, derived from the id when not set.
    pub fn get_title(&self) -> String {
        self.attributes
            .get_str("title")
            .map_or_else(|| headline(self.id()), ToString::to_string)
    }

    // ── Attributes ───────────────────────────────────────────────────

    /// Returns the attribute store.
    pub const fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// Returns the attribute store mutably.
    pub fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }

    /// Sets a plain attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.set(key, value);
        self
    }

    /// Stores a structured attribute.
    pub fn insert_attribute(&mut self, key: impl Into<String>, attribute: Attribute) -> &mut Self {
        self.attributes.insert(key, attribute);
        self
    }

    /// Returns the plain value of an attribute.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.attributes.value(key)
    }

    /// Returns `true` if the attribute is set, even to `null`.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.has(key)
    }

    /// Sets whether the field is readonly.
    pub fn readonly(&mut self, readonly: bool) -> &mut Self {
        self.set_attribute("readonly", readonly)
    }

    /// Returns `true` if the field is readonly.
    pub fn is_readonly(&self) -> bool {
        self.attributes.get_bool("readonly").unwrap_or(false)
    }

    /// Sets a prop passed to the frontend component as is.
    pub fn prop(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Returns the props.
    pub const fn props(&self) -> &serde_json::Map<String, Value> {
        &self.props
    }

    // ── Dependencies ─────────────────────────────────────────────────

    /// Appends a visibility dependency.
    pub fn add_dependency(&mut self, dependency: FieldDependency) -> &mut Self {
        match self.attributes.get_mut("dependencies") {
            Some(Attribute::Dependencies(dependencies)) => dependencies.push(dependency),
            _ => self
                .attributes
                .insert("dependencies", Attribute::Dependencies(vec![dependency])),
        }
        self
    }

    /// Returns the visibility dependencies.
    pub fn dependencies(&self) -> &[FieldDependency] {
        match self.attributes.get("dependencies") {
            Some(Attribute::Dependencies(dependencies)) => dependencies,
            _ => &[],
        }
    }

    // ── Capabilities ─────────────────────────────────────────────────

    /// Returns `true` if the field type mixes in `capability`.
    pub fn supports(&self, capability: Capability) -> bool {
        self.kind.supports(capability)
    }

    /// Returns `true` if the field type provides the builder method.
    pub fn has_method(&self, method: &str) -> bool {
        self.kind.has_method(method)
    }

    /// Fails with [`IgniteError::UndefinedOperation`] unless the field type
    /// provides `method`.
    pub fn ensure_method(&self, method: &str) -> IgniteResult<()> {
        if self.has_method(method) {
            Ok(())
        } else {
            Err(IgniteError::undefined(self.type_name(), method))
        }
    }

    /// Returns the validation rules, or `None` without the rules capability.
    ///
    /// The base `rules` always apply; `rule_type` merges the creation or
    /// update rules after them. Rules nothing is merged into keep their
    /// declared shape.
    pub fn get_rules(&self, rule_type: Option<RuleType>) -> Option<Rules> {
        if !self.supports(Capability::Rules) {
            return None;
        }
        let declared = |key: &str| self.attributes.value(key).and_then(Rules::from_value);
        let base = declared("rules");
        let extra = rule_type.and_then(|rule_type| declared(rule_type.attribute()));
        Some(match (base, extra) {
            (Some(base), Some(extra)) => base.merge(extra),
            (Some(rules), None) | (None, Some(rules)) => rules,
            (None, None) => Rules::List(Vec::new()),
        })
    }

    /// Returns `true` if the field stores one value per locale.
    pub fn is_translatable(&self) -> bool {
        self.supports(Capability::Translatable)
            && self.attributes.get_bool("translatable").unwrap_or(false)
    }

    /// Returns the relation kind, for relation fields.
    pub fn relation_kind(&self) -> Option<RelationKind> {
        self.kind.relation_kind()
    }

    /// Returns the relation accessor name, for relation fields.
    pub fn relation_name(&self) -> Option<&str> {
        self.relation_kind()
            .and_then(|_| self.attributes.get_str("relation_name"))
    }

    /// Returns the nested form of a field with the form capability.
    pub fn nested_form(&self) -> Option<&Form> {
        match self.attributes.get("form") {
            Some(Attribute::Form(form)) => Some(form),
            _ => None,
        }
    }

    /// Returns a named repeatable form of a block field.
    pub fn repeatable(&self, name: &str) -> Option<&Form> {
        match self.attributes.get("repeatables") {
            Some(Attribute::Forms(forms)) => forms.get(name),
            _ => None,
        }
    }

    // ── Slots ────────────────────────────────────────────────────────

    /// Places a frontend component into one of the field type's slots.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::InvalidConfiguration`] when the field type
    /// does not declare the slot.
    pub fn slot(&mut self, slot: &str, component: impl Into<Value>) -> IgniteResult<&mut Self> {
        if !self.kind.slots().contains(&slot) {
            return Err(IgniteError::InvalidConfiguration(format!(
                "Slot {slot} does not exist for Field {}",
                self.type_name()
            )));
        }
        let mut slots = match self.attributes.value("slots") {
            Some(Value::Object(slots)) => slots.clone(),
            _ => serde_json::Map::new(),
        };
        slots.insert(slot.to_string(), component.into());
        self.attributes.set("slots", Value::Object(slots));
        Ok(self)
    }

    // ── Authorization ────────────────────────────────────────────────

    /// Restricts the field to users accepted by `predicate`.
    pub fn authorize<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(Option<&AdminUser>) -> bool + Send + Sync + 'static,
    {
        self.authorize = Some(Arc::new(predicate));
        self
    }

    /// Returns `true` if `user` may see the field.
    pub fn authorized(&self, user: Option<&AdminUser>) -> bool {
        self.authorize.as_ref().map_or(true, |predicate| predicate(user))
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Sets whether the field's value is persisted.
    pub fn set_save(&mut self, save: bool) -> &mut Self {
        self.save = save;
        self
    }

    /// Sets whether the field's value is written into the model.
    pub fn set_fill(&mut self, fill: bool) -> &mut Self {
        self.fill = fill;
        self
    }

    /// Returns `true` if the field's value is persisted.
    pub const fn can_save(&self) -> bool {
        self.save
    }

    /// Returns `true` if the field's value is written into the model.
    pub const fn should_fill(&self) -> bool {
        self.fill
    }

    /// Returns `true` if the field is appended to its form's field list.
    pub fn should_be_registered(&self) -> bool {
        self.kind.should_be_registered()
    }

    /// Returns `true` for pure UI components.
    pub fn is_component(&self) -> bool {
        self.kind.is_component()
    }

    /// Converts a stored model value into the field's value.
    pub fn cast(&self, value: Value) -> Value {
        self.kind.cast(value)
    }

    /// Converts a submitted value before it is persisted.
    pub fn format(&self, value: Value) -> Value {
        self.kind.format(value)
    }

    /// Reshapes a value for display.
    pub fn transform(&self, value: Value) -> Value {
        self.kind.transform(value)
    }

    /// Writes a submitted value into `record` under `key`.
    pub fn fill_model(&self, record: &mut Record, key: &str, value: Value) {
        if self.fill {
            record.set(key, self.format(value));
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Returns the required attribute names.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Fails if any required attribute is absent, listing all of them.
    ///
    /// # Errors
    ///
    /// Returns one [`IgniteError::MissingRequiredAttribute`] enumerating
    /// every missing attribute.
    pub fn check_complete(&self) -> IgniteResult<()> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|name| !self.attributes.has(name))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(IgniteError::MissingRequiredAttribute {
            missing,
            field_type: self.type_name().to_string(),
            field_id: self.id().to_string(),
        })
    }

    /// Serializes the field for the presentation layer.
    ///
    /// Produces the attributes in insertion order, an always-present
    /// `dependencies` list, the props, and the `required` list.
    pub fn render(&self) -> IgniteResult<Value> {
        let mut map = serde_json::Map::new();
        for (key, attribute) in self.attributes.iter() {
            map.insert(key.to_string(), attribute.render()?);
        }
        if !map.contains_key("dependencies") {
            map.insert("dependencies".to_string(), json!([]));
        }
        for (key, value) in &self.props {
            map.insert(key.clone(), value.clone());
        }
        map.insert("required".to_string(), json!(self.required));
        Ok(Value::Object(map))
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("kind", &self.kind.name())
            .field("model", &self.model)
            .field("attributes", &self.attributes)
            .field("props", &self.props)
            .field("required", &self.required)
            .field("save", &self.save)
            .field("fill", &self.fill)
            .field("authorized", &self.authorize.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Modal, Password, Text};

    fn text(id: &str) -> IgniteResult<Field> {
        Field::new(Arc::new(Text), id, ModelType::form_model(), Some("crud/posts"))
    }

    #[test]
    fn test_media_id_is_reserved() {
        let err = text("media").unwrap_err();
        assert!(matches!(err, IgniteError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("media"));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        assert!(text("").is_err());
    }

    #[test]
    fn test_baseline_attributes() {
        let field = text("first_name").unwrap();
        let keys: Vec<&str> = field.attributes().keys().take(6).collect();
        assert_eq!(
            keys,
            vec!["id", "local_key", "route_prefix", "component", "readonly", "class"]
        );
        assert_eq!(field.id(), "first_name");
        assert_eq!(field.local_key(), "first_name");
        assert_eq!(field.route_prefix(), Some("crud/posts"));
        assert!(!field.is_readonly());
    }

    #[test]
    fn test_defaults_table_is_applied() {
        let field =
            Field::new(Arc::new(Modal), "confirm", ModelType::form_model(), None).unwrap();
        assert_eq!(field.value("size"), Some(&json!("md")));
        assert_eq!(field.value("variant"), Some(&json!("secondary")));
        assert_eq!(field.value("confirmWithPassword"), Some(&json!(false)));
        assert_eq!(field.value("route_prefix"), Some(&Value::Null));
    }

    #[test]
    fn test_required_is_merged_without_duplicates() {
        let field =
            Field::new(Arc::new(Modal), "confirm", ModelType::form_model(), None).unwrap();
        assert_eq!(field.required(), ["name".to_string(), "form".to_string()]);
    }

    #[test]
    fn test_check_complete_lists_every_missing_attribute() {
        let mut field =
            Field::new(Arc::new(Modal), "confirm", ModelType::form_model(), None).unwrap();
        let err = field.check_complete().unwrap_err();
        match &err {
            IgniteError::MissingRequiredAttribute {
                missing,
                field_type,
                field_id,
            } => {
                assert_eq!(missing, &["name".to_string(), "form".to_string()]);
                assert_eq!(field_type, "modal");
                assert_eq!(field_id, "confirm");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            err.to_string(),
            "Missing required attributes: [name, form] for modal field \"confirm\""
        );

        field.set_attribute("name", "confirm-modal");
        let err = field.check_complete().unwrap_err();
        assert!(err.to_string().contains("[form]"));

        field.set_attribute("form", Value::Null);
        assert!(field.check_complete().is_ok());
    }

    #[test]
    fn test_title_falls_back_to_headline() {
        let mut field = text("first_name").unwrap();
        assert_eq!(field.get_title(), "First Name");
        field.set_attribute("title", "Given name");
        assert_eq!(field.get_title(), "Given name");
    }

    #[test]
    fn test_dependencies_are_created_lazily() {
        let mut field = text("summary").unwrap();
        assert!(field.dependencies().is_empty());
        assert!(!field.has_attribute("dependencies"));

        field.add_dependency(FieldDependency::new("when", "published", true).unwrap());
        field.add_dependency(FieldDependency::new("orWhen", "featured", true).unwrap());
        assert_eq!(field.dependencies().len(), 2);
        assert_eq!(field.dependencies()[1].get_attribute_name(), "featured");
    }

    #[test]
    fn test_render() {
        let mut field = text("title").unwrap();
        field.prop("autofocus", true).readonly(true);
        let rendered = field.render().unwrap();
        assert_eq!(rendered["id"], json!("title"));
        assert_eq!(rendered["readonly"], json!(true));
        assert_eq!(rendered["dependencies"], json!([]));
        assert_eq!(rendered["autofocus"], json!(true));
        assert_eq!(rendered["required"], json!([]));
    }

    #[test]
    fn test_props_override_attributes() {
        let mut field = text("title").unwrap();
        field.prop("class", "wide");
        assert_eq!(field.render().unwrap()["class"], json!("wide"));
    }

    #[test]
    fn test_unknown_slot_is_rejected() {
        let mut field = text("title").unwrap();
        let err = field.slot("header", "my-header").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Slot header does not exist for Field text"
        );
    }

    #[test]
    fn test_rules() {
        let mut field = text("title").unwrap();
        field
            .set_attribute("rules", json!(["required"]))
            .set_attribute("update_rules", json!(["max:60"]));
        assert_eq!(field.get_rules(None), Some(Rules::from(["required"])));
        assert_eq!(
            field.get_rules(Some(RuleType::Update)),
            Some(Rules::from(["required", "max:60"]))
        );
        assert_eq!(
            field.get_rules(Some(RuleType::Creation)),
            Some(Rules::from(["required"]))
        );
    }

    #[test]
    fn test_rules_keep_declared_shape() {
        let mut field = text("title").unwrap();
        field
            .set_attribute("rules", "required|max:60")
            .set_attribute("creation_rules", "unique:posts");
        assert_eq!(field.get_rules(None), Some(Rules::from("required|max:60")));
        assert_eq!(
            serde_json::to_value(field.get_rules(None)).unwrap(),
            json!("required|max:60")
        );
        assert_eq!(
            field.get_rules(Some(RuleType::Creation)),
            Some(Rules::from(["required", "max:60", "unique:posts"]))
        );
        assert_eq!(text("slug").unwrap().get_rules(None), Some(Rules::List(Vec::new())));
        let modal = Field::new(Arc::new(Modal), "publish", ModelType::form_model(), None).unwrap();
        assert_eq!(modal.get_rules(None), None);
    }

    #[test]
    fn test_ensure_method() {
        let field = text("title").unwrap();
        assert!(field.ensure_method("rules").is_ok());
        let err = field.ensure_method("size").unwrap_err();
        assert_eq!(err.to_string(), "Call to undefined method text::size()");
    }

    #[test]
    fn test_authorize() {
        let mut field = text("secret").unwrap();
        assert!(field.authorized(None));
        field.authorize(|user| user.is_some_and(|u| u.has_role("admin")));
        assert!(!field.authorized(None));
        assert!(!field.authorized(Some(&AdminUser::new(1, "Ann"))));
        assert!(field.authorized(Some(&AdminUser::new(2, "Bob").with_role("admin"))));
    }

    #[test]
    fn test_fill_model_formats_value() {
        let field = text("title").unwrap();
        let mut record = Record::new(1);
        field.fill_model(&mut record, "title", json!("Hello"));
        assert_eq!(record.get("title"), Some(&json!("Hello")));

        let mut confirm =
            Field::new(Arc::new(Password), "pw", ModelType::form_model(), None).unwrap();
        confirm.set_fill(false);
        confirm.fill_model(&mut record, "pw", json!("secret"));
        assert!(record.get("pw").is_none());
    }
}
