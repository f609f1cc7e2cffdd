//! # ignite-rs
//!
//! Declarative admin forms and CRUD scaffolding for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `ignite-rs` to get the entire toolkit, or depend on
//! individual crates for finer-grained control.

/// Settings, logging and error types.
pub use ignite_rs_core as core;

/// Models, relation descriptors, the record store and the edit log.
#[cfg(feature = "db")]
pub use ignite_rs_db as db;

/// The form engine: fields, dependencies, relation fields and rendering.
#[cfg(feature = "crud")]
pub use ignite_rs_crud as crud;

/// The types most admin resources need.
pub mod prelude {
    pub use ignite_rs_core::{IgniteError, IgniteResult, Settings};

    #[cfg(feature = "db")]
    pub use ignite_rs_db::{Model, ModelStore, ModelType, Record, Relation, RelationKind};

    #[cfg(feature = "crud")]
    pub use ignite_rs_crud::{
        AdminUser, Condition, CrudController, CrudPermissions, Field, FieldBuilder, Form,
        FormConfig, RuleType, Rules,
    };
}

// Third-party re-exports for user convenience.
pub use async_trait::async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
pub use tracing_subscriber;
