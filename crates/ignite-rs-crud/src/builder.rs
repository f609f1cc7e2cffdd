//! The chaining field builder.
//!
//! Registering a field on a [`Form`] returns a [`FieldBuilder`] pointing at
//! the new field. Every builder method consumes and returns the builder, so
//! declarations read as one chain:
//!
//! ```
//! use ignite_rs_crud::form::Form;
//! use ignite_rs_crud::registry::FormConfig;
//! use ignite_rs_db::ModelType;
//!
//! # fn main() -> ignite_rs_core::IgniteResult<()> {
//! let mut form = Form::new(ModelType::form_model(), FormConfig::default().shared());
//! form.boolean("has_subtitle")?.title("Subtitle?");
//! form.text("subtitle")?
//!     .placeholder("A short subtitle")?
//!     .rules(["max:120"])?
//!     .when("has_subtitle", true)?;
//! # Ok(())
//! # }
//! ```
//!
//! Generic setters always succeed. Methods belonging to a capability or to a
//! specific field type return a `Result` and fail with
//! [`IgniteError::UndefinedOperation`] when the field's type doesn't provide
//! them. Dependency methods check that the referenced field exists.
//!
//! The builder dereferences to the [`Field`] it configures.

use std::fmt;
use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use serde_json::{json, Value};

use ignite_rs_core::{IgniteError, IgniteResult};

use crate::attributes::Attribute;
use crate::auth::AdminUser;
use crate::dependency::{Condition, FieldDependency};
use crate::field::{Field, Rules};
use crate::form::{Form, Slot};

/// The id of the password confirmation added to modals that require it.
pub const PASSWORD_CONFIRMATION_ID: &str = "__p_confirm";

/// Configures one field of a form.
pub struct FieldBuilder<'f> {
    form: &'f mut Form,
    slot: Slot,
}

impl<'f> FieldBuilder<'f> {
    pub(crate) fn new(form: &'f mut Form, slot: Slot) -> Self {
        Self { form, slot }
    }

    /// Returns the field being configured.
    pub fn field(&self) -> &Field {
        self.form.field_at(self.slot)
    }

    /// Returns the field being configured mutably.
    pub fn field_mut(&mut self) -> &mut Field {
        self.form.field_at_mut(self.slot)
    }

    fn require(&self, method: &str) -> IgniteResult<()> {
        self.field().ensure_method(method)
    }

    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.field_mut().set_attribute(key, value);
        self
    }

    fn set_checked(self, method: &str, key: &str, value: impl Into<Value>) -> IgniteResult<Self> {
        self.require(method)?;
        Ok(self.set(key, value))
    }

    // ── Generic ──────────────────────────────────────────────────────

    /// Sets the label.
    pub fn title(self, title: impl Into<String>) -> Self {
        self.set("title", title.into())
    }

    /// Sets the help text shown below the input.
    pub fn hint(self, hint: impl Into<String>) -> Self {
        self.set("hint", hint.into())
    }

    /// Sets the width in grid columns.
    pub fn width(self, width: u8) -> Self {
        self.set("width", width)
    }

    /// Sets the CSS class.
    pub fn class(self, class: impl Into<String>) -> Self {
        self.set("class", class.into())
    }

    /// Sets whether the field is readonly.
    pub fn readonly(self, readonly: bool) -> Self {
        self.set("readonly", readonly)
    }

    /// Sets the model attribute the field reads and writes.
    pub fn local_key(self, local_key: impl Into<String>) -> Self {
        self.set("local_key", local_key.into())
    }

    /// Sets an arbitrary attribute.
    pub fn attribute(self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value)
    }

    /// Sets a prop passed to the frontend component as is.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.field_mut().prop(key, value);
        self
    }

    /// Restricts the field to users accepted by `predicate`.
    pub fn authorize<F>(mut self, predicate: F) -> Self
    where
        F: Fn(Option<&AdminUser>) -> bool + Send + Sync + 'static,
    {
        self.field_mut().authorize(predicate);
        self
    }

    /// Places a frontend component into a slot of the field.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::InvalidConfiguration`] for unknown slots.
    pub fn slot(mut self, slot: &str, component: impl Into<Value>) -> IgniteResult<Self> {
        self.field_mut().slot(slot, component)?;
        Ok(self)
    }

    // ── Dependencies ─────────────────────────────────────────────────

    /// Adds a visibility dependency on the field `field_id`.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::InvalidConfiguration`] when the form has no
    /// field `field_id`.
    pub fn dependency(
        mut self,
        condition: Condition,
        field_id: &str,
        value: impl Into<Value>,
    ) -> IgniteResult<Self> {
        if !self.form.has_field(field_id) {
            return Err(IgniteError::InvalidConfiguration(format!(
                "Couldn't find field [{field_id}]"
            )));
        }
        self.field_mut()
            .add_dependency(FieldDependency::with_condition(condition, field_id, value));
        Ok(self)
    }

    /// Shows the field when `field_id` equals `value`.
    ///
    /// # Errors
    ///
    /// See [`dependency`](Self::dependency).
    pub fn when(self, field_id: &str, value: impl Into<Value>) -> IgniteResult<Self> {
        self.dependency(Condition::When, field_id, value)
    }

    /// Shows the field when `field_id` differs from `value`.
    ///
    /// # Errors
    ///
    /// See [`dependency`](Self::dependency).
    pub fn when_not(self, field_id: &str, value: impl Into<Value>) -> IgniteResult<Self> {
        self.dependency(Condition::WhenNot, field_id, value)
    }

    /// Shows the field when the list `field_id` contains `value`.
    ///
    /// # Errors
    ///
    /// See [`dependency`](Self::dependency).
    pub fn when_contains(self, field_id: &str, value: impl Into<Value>) -> IgniteResult<Self> {
        self.dependency(Condition::WhenContains, field_id, value)
    }

    /// Shows the field when `field_id` is one of `values`.
    ///
    /// # Errors
    ///
    /// See [`dependency`](Self::dependency).
    pub fn when_in(self, field_id: &str, values: impl Into<Value>) -> IgniteResult<Self> {
        self.dependency(Condition::WhenIn, field_id, values)
    }

    /// Disjunctive [`when`](Self::when).
    ///
    /// # Errors
    ///
    /// See [`dependency`](Self::dependency).
    pub fn or_when(self, field_id: &str, value: impl Into<Value>) -> IgniteResult<Self> {
        self.dependency(Condition::OrWhen, field_id, value)
    }

    /// Disjunctive [`when_not`](Self::when_not).
    ///
    /// # Errors
    ///
    /// See [`dependency`](Self::dependency).
    pub fn or_when_not(self, field_id: &str, value: impl Into<Value>) -> IgniteResult<Self> {
        self.dependency(Condition::OrWhenNot, field_id, value)
    }

    /// Disjunctive [`when_contains`](Self::when_contains).
    ///
    /// # Errors
    ///
    /// See [`dependency`](Self::dependency).
    pub fn or_when_contains(self, field_id: &str, value: impl Into<Value>) -> IgniteResult<Self> {
        self.dependency(Condition::OrWhenContains, field_id, value)
    }

    /// Disjunctive [`when_in`](Self::when_in).
    ///
    /// # Errors
    ///
    /// See [`dependency`](Self::dependency).
    pub fn or_when_in(self, field_id: &str, values: impl Into<Value>) -> IgniteResult<Self> {
        self.dependency(Condition::OrWhenIn, field_id, values)
    }

    /// Invokes a builder method by name.
    ///
    /// Only condition tokens (`whenNot`, `or_when_in`, ...) are dispatched,
    /// with `args` holding the field id and the value. This is the escape
    /// hatch for declarations loaded from data.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::UndefinedOperation`] for any other name and
    /// with [`IgniteError::InvalidConfiguration`] for malformed arguments.
    pub fn call(self, method: &str, args: &[Value]) -> IgniteResult<Self> {
        let Some(condition) = Condition::from_method_name(method) else {
            return Err(IgniteError::undefined(self.field().type_name(), method));
        };
        match args {
            [Value::String(field_id), value] => self.dependency(condition, field_id, value.clone()),
            _ => Err(IgniteError::InvalidConfiguration(format!(
                "{method} expects a field id and a value"
            ))),
        }
    }

    // ── Capabilities ─────────────────────────────────────────────────

    /// Sets the validation rules applied on every request.
    ///
    /// # Errors
    ///
    /// Fails unless the field type has the rules capability.
    pub fn rules(self, rules: impl Into<Rules>) -> IgniteResult<Self> {
        let rules: Rules = rules.into();
        self.set_checked("rules", "rules", rules)
    }

    /// Sets the validation rules applied only when creating.
    ///
    /// # Errors
    ///
    /// Fails unless the field type has the rules capability.
    pub fn creation_rules(self, rules: impl Into<Rules>) -> IgniteResult<Self> {
        let rules: Rules = rules.into();
        self.set_checked("creation_rules", "creation_rules", rules)
    }

    /// Sets the validation rules applied only when updating.
    ///
    /// # Errors
    ///
    /// Fails unless the field type has the rules capability.
    pub fn update_rules(self, rules: impl Into<Rules>) -> IgniteResult<Self> {
        let rules: Rules = rules.into();
        self.set_checked("update_rules", "update_rules", rules)
    }

    /// Stores one value per configured locale.
    ///
    /// # Errors
    ///
    /// Fails unless the field type is translatable.
    pub fn translatable(self, translatable: bool) -> IgniteResult<Self> {
        self.set_checked("translatable", "translatable", translatable)
    }

    /// Sets the placeholder text.
    ///
    /// # Errors
    ///
    /// Fails unless the field type supports placeholders.
    pub fn placeholder(self, placeholder: impl Into<String>) -> IgniteResult<Self> {
        self.set_checked("placeholder", "placeholder", placeholder.into())
    }

    /// Sets the maximum input length.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a text input.
    pub fn max(self, max: usize) -> IgniteResult<Self> {
        self.set_checked("max", "max", max)
    }

    /// Sets the HTML input type of a text input.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a `text` input.
    pub fn input_type(self, input_type: &str) -> IgniteResult<Self> {
        self.set_checked("type", "type", input_type)
    }

    /// Sets the number of rows a textarea grows to.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a `textarea`.
    pub fn max_rows(self, rows: u32) -> IgniteResult<Self> {
        self.set_checked("max_rows", "maxRows", rows)
    }

    /// Sets the columns shown in a relation's preview table.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a relation or a modal.
    pub fn preview<I, S>(self, columns: I) -> IgniteResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_checked("preview", "preview", string_list(columns))
    }

    // ── Modal ────────────────────────────────────────────────────────

    /// Sets the text previewed next to the modal button.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a relation or a modal.
    pub fn preview_text(self, preview: impl Into<String>) -> IgniteResult<Self> {
        self.set_checked("preview", "preview", preview.into())
    }

    /// Sets the modal name.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a modal.
    pub fn name(self, name: impl Into<String>) -> IgniteResult<Self> {
        self.set_checked("name", "name", name.into())
    }

    /// Sets the modal size (`sm`, `md`, `lg`, `xl`).
    ///
    /// # Errors
    ///
    /// Fails unless the field is a modal.
    pub fn size(self, size: &str) -> IgniteResult<Self> {
        self.set_checked("size", "size", size)
    }

    /// Sets the button variant.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a modal.
    pub fn variant(self, variant: &str) -> IgniteResult<Self> {
        self.set_checked("variant", "variant", variant)
    }

    /// Requires the current password before the modal form is submitted.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a modal.
    pub fn confirm_with_password(mut self) -> IgniteResult<Self> {
        self.require("confirm_with_password")?;
        self.field_mut().set_attribute("confirmWithPassword", true);
        if let Some(Attribute::Form(form)) = self.field_mut().attributes_mut().get_mut("form") {
            add_password_confirmation(form)?;
        }
        Ok(self)
    }

    /// Builds the nested form of the field.
    ///
    /// The nested form shares the model and configuration, lives under
    /// `{route_prefix}/modal`, and tags every field it registers with
    /// `params.field_id`.
    ///
    /// # Errors
    ///
    /// Fails unless the field type has the form capability, or when `build`
    /// fails.
    pub fn form<F>(mut self, build: F) -> IgniteResult<Self>
    where
        F: FnOnce(&mut Form) -> IgniteResult<()>,
    {
        self.require("form")?;
        let field = self.field();
        let field_id = field.id().to_string();
        let confirm = field.attributes().get_bool("confirmWithPassword").unwrap_or(false);
        let route_prefix = nested_route_prefix(field.route_prefix(), "modal");

        let mut nested = self.form.nested(route_prefix);
        nested.registered(move |nested_field: &mut Field| {
            nested_field.set_attribute("params", json!({ "field_id": field_id }));
        });
        build(&mut nested)?;
        if confirm {
            add_password_confirmation(&mut nested)?;
        }

        self.field_mut()
            .insert_attribute("form", Attribute::Form(Box::new(nested)));
        Ok(self)
    }

    // ── Block ────────────────────────────────────────────────────────

    /// Adds a named repeatable form to a block field.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a block, or when `build` fails.
    pub fn repeatable<F>(mut self, name: &str, build: F) -> IgniteResult<Self>
    where
        F: FnOnce(&mut Form) -> IgniteResult<()>,
    {
        self.require("repeatable")?;
        let field = self.field();
        let field_id = field.id().to_string();
        let route_prefix = nested_route_prefix(field.route_prefix(), &format!("block/{name}"));

        let mut nested = self.form.nested(route_prefix);
        let repeatable = name.to_string();
        nested.registered(move |nested_field: &mut Field| {
            nested_field.set_attribute(
                "params",
                json!({ "field_id": field_id, "repeatable": repeatable }),
            );
        });
        build(&mut nested)?;

        let attributes = self.field_mut().attributes_mut();
        if let Some(Attribute::Forms(forms)) = attributes.get_mut("repeatables") {
            forms.insert(name.to_string(), nested);
        } else {
            let mut forms = IndexMap::new();
            forms.insert(name.to_string(), nested);
            attributes.insert("repeatables", Attribute::Forms(forms));
        }
        Ok(self)
    }

    /// Sets the width of the block's content column.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a block.
    pub fn block_width(self, width: u8) -> IgniteResult<Self> {
        self.set_checked("block_width", "blockWidth", width)
    }

    // ── Password ─────────────────────────────────────────────────────

    /// Turns a password field into a confirmation of the current password.
    ///
    /// The value is neither filled into the model nor saved.
    ///
    /// # Errors
    ///
    /// Fails unless the field is a password.
    pub fn confirm(mut self) -> IgniteResult<Self> {
        self.require("confirm")?;
        self.field_mut()
            .set_attribute("confirm", true)
            .set_save(false)
            .set_fill(false);
        Ok(self)
    }
}

impl Deref for FieldBuilder<'_> {
    type Target = Field;

    fn deref(&self) -> &Field {
        self.field()
    }
}

impl DerefMut for FieldBuilder<'_> {
    fn deref_mut(&mut self) -> &mut Field {
        self.field_mut()
    }
}

impl fmt::Debug for FieldBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBuilder")
            .field("field", self.field())
            .field("slot", &self.slot)
            .finish()
    }
}

fn string_list<I, S>(items: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Array(items.into_iter().map(|s| Value::String(s.into())).collect())
}

fn nested_route_prefix(route_prefix: Option<&str>, suffix: &str) -> String {
    match route_prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/{suffix}"),
        _ => suffix.to_string(),
    }
}

fn add_password_confirmation(form: &mut Form) -> IgniteResult<()> {
    if !form.has_field(PASSWORD_CONFIRMATION_ID) {
        form.password(PASSWORD_CONFIRMATION_ID)?
            .title("Password")
            .confirm()?;
    }
    Ok(())
}
