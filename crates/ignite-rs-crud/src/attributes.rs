//! The per-field attribute store.
//!
//! Every [`Field`](crate::field::Field) keeps its configuration in an
//! [`AttributeStore`]: an insertion-ordered map from attribute name to
//! [`Attribute`]. Most attributes are plain JSON values, but a few carry
//! structure the engine needs to keep typed until render time (the
//! dependency list and nested forms).
//!
//! The store does no validation. Required-ness and typing are enforced by the
//! field layer above it. A key explicitly set to `null` is still present, so
//! `has` distinguishes "absent" from "set to null".

use indexmap::IndexMap;
use serde_json::Value;

use ignite_rs_core::IgniteResult;

use crate::dependency::FieldDependency;
use crate::form::Form;

/// A single attribute value.
#[derive(Debug)]
pub enum Attribute {
    /// A plain JSON value.
    Value(Value),
    /// The conditional visibility rules of a field.
    Dependencies(Vec<FieldDependency>),
    /// A nested form (modals).
    Form(Box<Form>),
    /// Named nested forms (block repeatables).
    Forms(IndexMap<String, Form>),
}

impl Attribute {
    /// Returns the JSON value, if this is a plain value.
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Serializes the attribute for the presentation layer.
    pub fn render(&self) -> IgniteResult<Value> {
        Ok(match self {
            Self::Value(value) => value.clone(),
            Self::Dependencies(dependencies) => {
                Value::Array(dependencies.iter().map(FieldDependency::render).collect())
            }
            Self::Form(form) => form.render()?,
            Self::Forms(forms) => {
                let mut map = serde_json::Map::new();
                for (name, form) in forms {
                    map.insert(name.clone(), form.render()?);
                }
                Value::Object(map)
            }
        })
    }
}

impl From<Value> for Attribute {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// An insertion-ordered attribute map.
///
/// # Examples
///
/// ```
/// use ignite_rs_crud::attributes::AttributeStore;
///
/// let mut store = AttributeStore::new();
/// store.set("title", "Headline");
/// store.set("hint", serde_json::Value::Null);
///
/// assert_eq!(store.get_str("title"), Some("Headline"));
/// assert!(store.has("hint"));
/// assert!(!store.has("placeholder"));
/// ```
#[derive(Debug, Default)]
pub struct AttributeStore {
    attributes: IndexMap<String, Attribute>,
}

impl AttributeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a plain value, replacing any previous attribute under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes
            .insert(key.into(), Attribute::Value(value.into()));
    }

    /// Stores a structured attribute under `key`.
    pub fn insert(&mut self, key: impl Into<String>, attribute: Attribute) {
        self.attributes.insert(key.into(), attribute);
    }

    /// Returns the attribute under `key`.
    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    /// Returns the attribute under `key` mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Attribute> {
        self.attributes.get_mut(key)
    }

    /// Returns `true` if `key` is present, even when set to `null`.
    pub fn has(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Removes and returns the attribute under `key`, keeping the order of
    /// the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Attribute> {
        self.attributes.shift_remove(key)
    }

    /// Returns the plain value under `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(Attribute::as_value)
    }

    /// Returns the value under `key` as a string slice.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    /// Returns the value under `key` as a bool.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(Value::as_bool)
    }

    /// Returns the value under `key` as a list of strings.
    ///
    /// A single string is treated as a one-element list. Non-string entries
    /// are skipped.
    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        match self.value(key)? {
            Value::String(s) => Some(vec![s.clone()]),
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Iterates over all attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the attribute names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut store = AttributeStore::new();
        store.set("readonly", false);
        assert_eq!(store.get_bool("readonly"), Some(false));
        assert_eq!(store.value("readonly"), Some(&json!(false)));
    }

    #[test]
    fn test_null_is_present() {
        let mut store = AttributeStore::new();
        store.set("route_prefix", Value::Null);
        assert!(store.has("route_prefix"));
        assert_eq!(store.value("route_prefix"), Some(&Value::Null));
        assert!(store.get_str("route_prefix").is_none());
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut store = AttributeStore::new();
        store.set("id", "a");
        store.set("local_key", "a");
        store.set("class", "");
        store.set("id", "b");
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["id", "local_key", "class"]);
        assert_eq!(store.get_str("id"), Some("b"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut store = AttributeStore::new();
        store.set("a", 1);
        store.set("b", 2);
        store.set("c", 3);
        assert!(store.remove("b").is_some());
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_string_list() {
        let mut store = AttributeStore::new();
        store.set("rules", json!(["required", "max:60"]));
        store.set("single", "required");
        store.set("number", 3);
        assert_eq!(
            store.get_string_list("rules"),
            Some(vec!["required".to_string(), "max:60".to_string()])
        );
        assert_eq!(store.get_string_list("single"), Some(vec!["required".to_string()]));
        assert_eq!(store.get_string_list("number"), None);
        assert_eq!(store.get_string_list("missing"), None);
    }

    #[test]
    fn test_render_dependencies() {
        let dependency = FieldDependency::new("when", "published", true).unwrap();
        let attribute = Attribute::Dependencies(vec![dependency]);
        assert_eq!(
            attribute.render().unwrap(),
            json!([{"condition": "when", "attribute": "published", "value": true}])
        );
    }
}
