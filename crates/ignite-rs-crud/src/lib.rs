//! # ignite-rs-crud
//!
//! The declarative form engine of the ignite-rs admin toolkit. An admin
//! resource declares its form as an ordered list of fields bound to model
//! attributes or relations; the engine validates the declaration, resolves
//! relation fields against the model, aggregates validation rules and
//! serializes everything for the frontend renderer.
//!
//! ## Module Overview
//!
//! - [`attributes`] - The ordered per-field attribute store
//! - [`field_type`] - The [`FieldType`](field_type::FieldType) trait and capabilities
//! - [`field`] - [`Field`](field::Field) construction, completeness and rendering
//! - [`fields`] - Built-in field types (text, modal, block, relations, ...)
//! - [`dependency`] - Conditional visibility between fields
//! - [`registry`] - Field-type registry, relation map and shared form configuration
//! - [`relation`] - Resolving relation accessors into relation fields
//! - [`form`] - The [`Form`](form::Form) field registry
//! - [`builder`] - The chaining [`FieldBuilder`](builder::FieldBuilder)
//! - [`auth`] - Admin users and CRUD permissions
//! - [`media`] - Media conversions and the reserved `media` attribute
//! - [`controller`] - CRUD controller glue over a model store

pub mod attributes;
pub mod auth;
pub mod builder;
pub mod controller;
pub mod dependency;
pub mod field;
pub mod field_type;
pub mod fields;
pub mod form;
pub mod media;
pub mod registry;
pub mod relation;

// Re-export the most commonly used types at the crate root.
pub use attributes::{Attribute, AttributeStore};
pub use auth::{AdminUser, CrudPermissions};
pub use builder::FieldBuilder;
pub use controller::{CrudController, ShowPage};
pub use dependency::{Condition, FieldDependency};
pub use field::{Field, RuleType, Rules};
pub use field_type::{Capability, FieldType};
pub use form::Form;
pub use registry::{FieldRegistry, FormConfig, RelationMap};
