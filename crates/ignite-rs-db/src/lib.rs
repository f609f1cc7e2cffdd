//! # ignite-rs-db
//!
//! The persistence boundary of the ignite-rs toolkit. The form engine does not
//! own queries or transactions; it only needs to introspect relations on a
//! model type and to read and write record attributes.
//!
//! ## Module Overview
//!
//! - [`model`] - The [`Model`](model::Model) trait, [`ModelType`](model::ModelType)
//!   descriptors and relation introspection
//! - [`store`] - The async [`ModelStore`](store::ModelStore) trait and an
//!   in-memory implementation
//! - [`track_edits`] - An audit trail of who last updated a record

pub mod model;
pub mod store;
pub mod track_edits;

// Re-export the most commonly used types at the crate root.
pub use model::{FormModel, Model, ModelType, Relation, RelationKind};
pub use store::{InMemoryModelStore, ModelStore, Record};
pub use track_edits::{EditLog, InMemoryEditLog, ModelEdit};
