//! Record persistence for CRUD controllers.
//!
//! The [`ModelStore`] trait abstracts over the actual database backend. Records
//! are generic [`Record`] values holding JSON attributes, because the CRUD
//! layer is generic over every model a form can be bound to.
//!
//! [`InMemoryModelStore`] is the default implementation, used in tests and
//! for prototyping.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use ignite_rs_core::{IgniteError, IgniteResult};

/// A stored record of some model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The primary key.
    pub id: u64,
    /// Attribute values, keyed by column name.
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// Creates a record with the given id and no attributes.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            attributes: serde_json::Map::new(),
        }
    }

    /// Returns an attribute value.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Sets an attribute value.
    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.attributes.insert(key.into(), value);
    }

    /// Serializes the record as `{id, ...attributes}`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("id".to_string(), serde_json::json!(self.id));
        for (key, value) in &self.attributes {
            map.insert(key.clone(), value.clone());
        }
        serde_json::Value::Object(map)
    }
}

/// Async persistence operations used by the CRUD controller.
#[async_trait]
pub trait ModelStore: Send + Sync {
    /// Finds a record by primary key.
    async fn find(&self, model: &str, id: u64) -> Option<Record>;

    /// Finds a record by primary key or fails with `DoesNotExist`.
    async fn find_or_fail(&self, model: &str, id: u64) -> IgniteResult<Record> {
        self.find(model, id)
            .await
            .ok_or_else(|| IgniteError::DoesNotExist(format!("{model} with id {id}")))
    }

    /// Creates a new record from the given attributes, assigning its id.
    async fn create(
        &self,
        model: &str,
        attributes: serde_json::Map<String, serde_json::Value>,
    ) -> Record;

    /// Persists an existing record, replacing its attributes.
    async fn save(&self, model: &str, record: &Record) -> IgniteResult<()>;

    /// Deletes a record. Returns `true` if it existed.
    async fn delete(&self, model: &str, id: u64) -> bool;

    /// Returns all primary keys of a model in ascending order.
    async fn ids(&self, model: &str) -> Vec<u64>;
}

/// An in-memory [`ModelStore`].
#[derive(Debug, Default)]
pub struct InMemoryModelStore {
    tables: RwLock<HashMap<String, BTreeMap<u64, Record>>>,
}

impl InMemoryModelStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ModelStore for InMemoryModelStore {
    async fn find(&self, model: &str, id: u64) -> Option<Record> {
        let tables = self
            .tables
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        tables.get(model)?.get(&id).cloned()
    }

    async fn create(
        &self,
        model: &str,
        attributes: serde_json::Map<String, serde_json::Value>,
    ) -> Record {
        let mut tables = self
            .tables
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let table = tables.entry(model.to_string()).or_default();
        let id = table.keys().next_back().map_or(1, |last| last + 1);
        let record = Record { id, attributes };
        table.insert(id, record.clone());
        tracing::debug!(model, id, "created record");
        record
    }

    async fn save(&self, model: &str, record: &Record) -> IgniteResult<()> {
        let mut tables = self
            .tables
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let stored = tables
            .get_mut(model)
            .and_then(|table| table.get_mut(&record.id))
            .ok_or_else(|| IgniteError::DoesNotExist(format!("{model} with id {}", record.id)))?;
        stored.clone_from(record);
        Ok(())
    }

    async fn delete(&self, model: &str, id: u64) -> bool {
        let mut tables = self
            .tables
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        tables
            .get_mut(model)
            .is_some_and(|table| table.remove(&id).is_some())
    }

    async fn ids(&self, model: &str) -> Vec<u64> {
        let tables = self
            .tables
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        tables
            .get(model)
            .map(|table| table.keys().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(title: &str) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("title".to_string(), serde_json::json!(title));
        map
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryModelStore::new();
        let a = store.create("post", attrs("a")).await;
        let b = store.create("post", attrs("b")).await;
        let c = store.create("comment", attrs("c")).await;
        assert_eq!((a.id, b.id, c.id), (1, 2, 1));
    }

    #[tokio::test]
    async fn test_find_or_fail() {
        let store = InMemoryModelStore::new();
        store.create("post", attrs("hello")).await;

        let found = store.find_or_fail("post", 1).await.unwrap();
        assert_eq!(found.get("title"), Some(&serde_json::json!("hello")));

        let err = store.find_or_fail("post", 9).await.unwrap_err();
        assert_eq!(err.to_string(), "Object does not exist: post with id 9");
    }

    #[tokio::test]
    async fn test_save_replaces_attributes() {
        let store = InMemoryModelStore::new();
        let mut record = store.create("post", attrs("old")).await;
        record.set("title", serde_json::json!("new"));
        store.save("post", &record).await.unwrap();
        assert_eq!(store.find("post", 1).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_save_unknown_record_fails() {
        let store = InMemoryModelStore::new();
        let err = store.save("post", &Record::new(3)).await.unwrap_err();
        assert!(matches!(err, IgniteError::DoesNotExist(_)));
    }

    #[tokio::test]
    async fn test_delete_and_ids() {
        let store = InMemoryModelStore::new();
        for title in ["a", "b", "c"] {
            store.create("post", attrs(title)).await;
        }
        assert!(store.delete("post", 2).await);
        assert!(!store.delete("post", 2).await);
        assert_eq!(store.ids("post").await, vec![1, 3]);
        assert!(store.ids("tag").await.is_empty());
    }

    #[test]
    fn test_record_to_json() {
        let mut record = Record::new(7);
        record.set("title", serde_json::json!("x"));
        assert_eq!(record.to_json(), serde_json::json!({"id": 7, "title": "x"}));
    }
}
