//! CRUD controller glue.
//!
//! [`CrudController`] connects a form definition to a [`ModelStore`]: it
//! loads records, renders the show page, writes submitted values back
//! through the fields, orders and deletes records, and records who edited
//! what. Transport concerns (routing, request parsing, responses) belong to
//! the hosting application.
//!
//! The form definition is re-run for every call, so no form state outlives
//! a request.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use ignite_rs_core::{IgniteError, IgniteResult};
use ignite_rs_db::{EditLog, ModelEdit, ModelStore, ModelType, Record};

use crate::auth::{AdminUser, CrudPermissions};
use crate::field::Field;
use crate::form::Form;
use crate::registry::FormConfig;

/// Declares the fields of a form.
pub type FormDefinition = Arc<dyn Fn(&mut Form) -> IgniteResult<()> + Send + Sync>;

/// Everything the show page of one record needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowPage {
    /// The record, with every field value cast for display.
    pub model: Value,
    /// The rendered form.
    pub form: Value,
    /// Relation names the frontend should load with the record.
    pub eager_load: Vec<String>,
    /// What the current user may do with the record.
    pub permissions: CrudPermissions,
    /// The most recent tracked edit.
    pub last_edit: Option<ModelEdit>,
}

/// CRUD operations for one model.
pub struct CrudController {
    model: ModelType,
    config: Arc<FormConfig>,
    route_prefix: String,
    store: Arc<dyn ModelStore>,
    edits: Arc<dyn EditLog>,
    definition: FormDefinition,
}

impl CrudController {
    /// Creates a controller with an empty form definition.
    ///
    /// The route prefix defaults to `crud/{model name}`.
    pub fn new(
        model: ModelType,
        config: Arc<FormConfig>,
        store: Arc<dyn ModelStore>,
        edits: Arc<dyn EditLog>,
    ) -> Self {
        Self {
            model,
            config,
            route_prefix: format!("crud/{}", model.name()),
            store,
            edits,
            definition: Arc::new(|_| Ok(())),
        }
    }

    /// Sets the route prefix of the show form.
    #[must_use]
    pub fn route_prefix(mut self, route_prefix: impl Into<String>) -> Self {
        self.route_prefix = route_prefix.into();
        self
    }

    /// Sets the declaration of the show form.
    #[must_use]
    pub fn form<F>(mut self, definition: F) -> Self
    where
        F: Fn(&mut Form) -> IgniteResult<()> + Send + Sync + 'static,
    {
        self.definition = Arc::new(definition);
        self
    }

    /// Returns the bound model.
    pub const fn model(&self) -> ModelType {
        self.model
    }

    /// Builds a fresh show form.
    ///
    /// # Errors
    ///
    /// Propagates declaration errors of the form definition.
    pub fn build_form(&self) -> IgniteResult<Form> {
        let mut form = Form::new(self.model, Arc::clone(&self.config));
        form.set_route_prefix(&self.route_prefix);
        (self.definition)(&mut form)?;
        Ok(form)
    }

    /// Loads a record.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::DoesNotExist`] for unknown ids.
    pub async fn load(&self, id: u64) -> IgniteResult<Record> {
        self.store.find_or_fail(self.model.name(), id).await
    }

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Fails with [`IgniteError::DoesNotExist`] for unknown ids.
    pub async fn destroy(&self, id: u64) -> IgniteResult<()> {
        if self.store.delete(self.model.name(), id).await {
            tracing::info!(model = self.model.name(), id, "deleted record");
            Ok(())
        } else {
            Err(IgniteError::DoesNotExist(format!(
                "{} with id {id}",
                self.model.name()
            )))
        }
    }

    /// Deletes several records, returning how many existed.
    pub async fn delete_many(&self, ids: &[u64]) -> usize {
        let mut deleted = 0;
        for id in ids {
            if self.store.delete(self.model.name(), *id).await {
                deleted += 1;
            }
        }
        tracing::info!(model = self.model.name(), deleted, "deleted records");
        deleted
    }

    /// Writes each record's position in `ids` into the model's order column.
    ///
    /// Unknown ids are skipped. Returns the number of reordered records.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn order(&self, ids: &[u64]) -> IgniteResult<usize> {
        let name = self.model.name();
        let column = self.model.instantiate().order_column();
        let mut ordered = 0;
        for (position, id) in ids.iter().enumerate() {
            let Some(mut record) = self.store.find(name, *id).await else {
                tracing::debug!(model = name, id, "skipping unknown id while ordering");
                continue;
            };
            record.set(column, json!(position));
            self.store.save(name, &record).await?;
            ordered += 1;
        }
        Ok(ordered)
    }

    /// Returns the ids right before and after `id`.
    pub async fn near_siblings(&self, id: u64) -> (Option<u64>, Option<u64>) {
        let ids = self.store.ids(self.model.name()).await;
        let previous = ids.iter().copied().filter(|other| *other < id).max();
        let next = ids.iter().copied().filter(|other| *other > id).min();
        (previous, next)
    }

    /// Builds the show page of a record.
    ///
    /// Without update permission every field is rendered readonly.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and incomplete form declarations.
    pub async fn show(
        &self,
        id: u64,
        user: Option<&AdminUser>,
        permissions: CrudPermissions,
    ) -> IgniteResult<ShowPage> {
        let record = self.load(id).await?;
        let mut form = self.build_form()?;
        if !permissions.update {
            for field in form.fields_mut() {
                field.readonly(true);
            }
        }

        let eager_load = form
            .fields()
            .iter()
            .filter_map(Field::relation_name)
            .map(ToString::to_string)
            .collect();

        Ok(ShowPage {
            model: cast_record(&form, &record),
            form: form.render_for(user)?,
            eager_load,
            permissions,
            last_edit: self.edits.last_edit(self.model.name(), id),
        })
    }

    /// Writes submitted values into a record and saves it.
    ///
    /// Only fillable, saveable, writable model fields are written, each
    /// through its [`format`](Field::format). Translatable fields read
    /// `<locale>.<local_key>` inputs and store an object keyed by locale.
    /// The update is tracked when a user is given.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids, incomplete form declarations and store
    /// failures.
    pub async fn update(
        &self,
        id: u64,
        user: Option<&AdminUser>,
        input: &serde_json::Map<String, Value>,
    ) -> IgniteResult<Record> {
        let form = self.build_form()?;
        let mut record = self.load(id).await?;

        for field in form.fields() {
            if field.is_component()
                || field.is_readonly()
                || !field.can_save()
                || field.relation_kind().is_some()
            {
                continue;
            }
            let key = field.local_key();
            if field.is_translatable() {
                let mut translations = record
                    .get(key)
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                let mut changed = false;
                for locale in self.config.locales() {
                    if let Some(value) = input.get(&format!("{locale}.{key}")) {
                        translations.insert(locale.clone(), value.clone());
                        changed = true;
                    }
                }
                if changed {
                    field.fill_model(&mut record, key, Value::Object(translations));
                }
            } else if let Some(value) = input.get(key) {
                field.fill_model(&mut record, key, value.clone());
            }
        }

        self.store.save(self.model.name(), &record).await?;
        self.edits
            .record_update(self.model.name(), id, user.map(|user| user.id));
        tracing::info!(model = self.model.name(), id, "updated record");
        Ok(record)
    }
}

/// Serializes a record, casting each field's value for display.
fn cast_record(form: &Form, record: &Record) -> Value {
    let mut model = record.to_json();
    if let Value::Object(attributes) = &mut model {
        for field in form.fields().iter().filter(|field| !field.is_component()) {
            if let Some(value) = attributes.get_mut(field.local_key()) {
                *value = field.cast(value.take());
            }
        }
    }
    model
}

impl fmt::Debug for CrudController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudController")
            .field("model", &self.model)
            .field("route_prefix", &self.route_prefix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignite_rs_db::{InMemoryEditLog, InMemoryModelStore, Model, Relation};

    #[derive(Default)]
    struct Post;

    impl Model for Post {
        fn model_name(&self) -> &'static str {
            "post"
        }

        fn relation(&self, name: &str) -> Option<Relation> {
            match name {
                "comments" => Some(Relation::has_many("comment")),
                _ => None,
            }
        }
    }

    fn attrs(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    async fn controller() -> (CrudController, Arc<InMemoryModelStore>, Arc<InMemoryEditLog>) {
        let store = Arc::new(InMemoryModelStore::new());
        let edits = Arc::new(InMemoryEditLog::new());
        for title in ["first", "second", "third"] {
            store
                .create("post", attrs(json!({"title": title, "active": 1, "password": "hash"})))
                .await;
        }
        let config = FormConfig::default().with_locales(["en", "de"]).shared();
        let controller = CrudController::new(
            ModelType::of::<Post>(),
            config,
            Arc::clone(&store) as Arc<dyn ModelStore>,
            Arc::clone(&edits) as Arc<dyn EditLog>,
        )
        .form(|form| {
            form.text("title")?.rules(["required"])?;
            form.text("summary")?.translatable(true)?;
            form.boolean("active")?;
            form.password("password")?;
            form.component("post-stats")?;
            form.relation("comments")?.preview(["text"])?;
            Ok(())
        });
        (controller, store, edits)
    }

    #[tokio::test]
    async fn test_show_renders_form_and_casts() {
        let (controller, _, _) = controller().await;
        let page = controller
            .show(1, None, CrudPermissions::default())
            .await
            .unwrap();

        assert_eq!(page.model["title"], json!("first"));
        assert_eq!(page.model["active"], json!(true));
        assert_eq!(page.model["password"], Value::Null);
        assert_eq!(page.eager_load, vec!["comments".to_string()]);
        assert_eq!(page.form["fields"].as_array().unwrap().len(), 6);
        assert_eq!(page.form["fields"][0]["route_prefix"], json!("crud/post"));
        assert_eq!(page.form["fields"][0]["readonly"], json!(false));
        assert!(page.last_edit.is_none());
    }

    #[tokio::test]
    async fn test_show_without_update_permission_is_readonly() {
        let (controller, _, _) = controller().await;
        let page = controller
            .show(2, None, CrudPermissions::read_only())
            .await
            .unwrap();
        for field in page.form["fields"].as_array().unwrap() {
            assert_eq!(field["readonly"], json!(true));
        }
    }

    #[tokio::test]
    async fn test_show_unknown_record() {
        let (controller, _, _) = controller().await;
        let err = controller
            .show(99, None, CrudPermissions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, IgniteError::DoesNotExist(_)));
    }

    #[tokio::test]
    async fn test_update_fills_formats_and_tracks() {
        let (controller, store, edits) = controller().await;
        let user = AdminUser::new(7, "Ada");
        let input = attrs(json!({
            "title": "renamed",
            "active": "0",
            "en.summary": "Hello",
            "de.summary": "Hallo",
            "post-stats": "ignored",
            "comments": [1, 2],
        }));

        let record = controller.update(1, Some(&user), &input).await.unwrap();
        assert_eq!(record.get("title"), Some(&json!("renamed")));
        assert_eq!(record.get("active"), Some(&json!(false)));
        assert_eq!(
            record.get("summary"),
            Some(&json!({"en": "Hello", "de": "Hallo"}))
        );
        assert!(record.get("post-stats").is_none());
        assert!(record.get("comments").is_none());

        assert_eq!(store.find("post", 1).await.unwrap(), record);
        assert_eq!(edits.last_edit("post", 1).unwrap().user_id, 7);
    }

    #[tokio::test]
    async fn test_order_skips_unknown_ids() {
        let (controller, store, _) = controller().await;
        let ordered = controller.order(&[3, 42, 1, 2]).await.unwrap();
        assert_eq!(ordered, 3);
        assert_eq!(store.find("post", 3).await.unwrap().get("order_column"), Some(&json!(0)));
        assert_eq!(store.find("post", 2).await.unwrap().get("order_column"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_destroy_and_delete_many() {
        let (controller, store, _) = controller().await;
        controller.destroy(1).await.unwrap();
        assert!(controller.destroy(1).await.is_err());
        assert_eq!(controller.delete_many(&[2, 3, 4]).await, 2);
        assert!(store.ids("post").await.is_empty());
    }

    #[tokio::test]
    async fn test_near_siblings() {
        let (controller, _, _) = controller().await;
        assert_eq!(controller.near_siblings(2).await, (Some(1), Some(3)));
        assert_eq!(controller.near_siblings(1).await, (None, Some(2)));
        assert_eq!(controller.near_siblings(3).await, (Some(2), None));
    }
}
