//! Edit tracking.
//!
//! Every update performed by an authenticated admin user is recorded as a
//! [`ModelEdit`], so the show page can display who last touched a record.
//! Updates without a user (console jobs, seeders) are not tracked.
//!
//! # Examples
//!
//! ```
//! use ignite_rs_db::track_edits::{EditLog, InMemoryEditLog};
//!
//! let log = InMemoryEditLog::new();
//! log.record_update("post", 42, Some(1));
//! log.record_update("post", 42, None);
//!
//! assert_eq!(log.edits_for("post", 42).len(), 1);
//! assert_eq!(log.last_edit("post", 42).unwrap().user_id, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single tracked update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEdit {
    /// Auto-generated primary key.
    pub id: u64,
    /// The model name of the updated record.
    pub model_type: String,
    /// The primary key of the updated record.
    pub model_id: u64,
    /// The admin user who performed the update.
    pub user_id: u64,
    /// When the update happened.
    pub created_at: DateTime<Utc>,
}

/// Storage for tracked edits.
pub trait EditLog: Send + Sync {
    /// Records an update. Returns `None` without a user.
    fn record_update(&self, model_type: &str, model_id: u64, user_id: Option<u64>)
        -> Option<ModelEdit>;

    /// Returns all edits of one record, oldest first.
    fn edits_for(&self, model_type: &str, model_id: u64) -> Vec<ModelEdit>;

    /// Returns the most recent edit of one record.
    fn last_edit(&self, model_type: &str, model_id: u64) -> Option<ModelEdit> {
        self.edits_for(model_type, model_id)
            .into_iter()
            .max_by_key(|edit| edit.id)
    }
}

/// An in-memory [`EditLog`].
#[derive(Debug)]
pub struct InMemoryEditLog {
    edits: RwLock<Vec<ModelEdit>>,
    next_id: AtomicU64,
}

impl Default for InMemoryEditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEditLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self {
            edits: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the total number of tracked edits.
    pub fn len(&self) -> usize {
        self.edits
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing has been tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EditLog for InMemoryEditLog {
    fn record_update(
        &self,
        model_type: &str,
        model_id: u64,
        user_id: Option<u64>,
    ) -> Option<ModelEdit> {
        let user_id = user_id?;
        let edit = ModelEdit {
            id: self.next_id.fetch_add(1, AtomicOrdering::SeqCst),
            model_type: model_type.to_string(),
            model_id,
            user_id,
            created_at: Utc::now(),
        };
        self.edits
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(edit.clone());
        tracing::debug!(model_type, model_id, user_id, "tracked edit");
        Some(edit)
    }

    fn edits_for(&self, model_type: &str, model_id: u64) -> Vec<ModelEdit> {
        self.edits
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|edit| edit.model_type == model_type && edit.model_id == model_id)
            .cloned()
            .collect()
    }
}
