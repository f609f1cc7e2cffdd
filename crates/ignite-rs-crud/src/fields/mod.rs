//! Built-in field types.
//!
//! Every type here is a stateless unit (or `Copy`) struct implementing
//! [`FieldType`](crate::field_type::FieldType). They are registered under
//! their tag by [`FieldRegistry::with_defaults`](crate::registry::FieldRegistry::with_defaults).
//!
//! | Tag | Type | Notes |
//! |---|---|---|
//! | `text` | [`Text`] | rules, translatable, placeholder |
//! | `textarea` | [`Textarea`] | rules, translatable, placeholder |
//! | `boolean` | [`Boolean`] | casts to `bool` |
//! | `password` | [`Password`] | never sends the stored value |
//! | `modal` | [`Modal`] | nested form |
//! | `block` | [`Block`] | named repeatable forms |
//! | `component` | [`Component`] | pure UI, not a model value |
//! | relation tags | [`RelationField`], [`MorphTo`], [`MorphToRegistrar`] | model relations |

mod block;
mod boolean;
mod component;
mod modal;
mod password;
mod relations;
mod text;

pub use block::Block;
pub use boolean::Boolean;
pub use component::Component;
pub use modal::Modal;
pub use password::Password;
pub use relations::{MorphTo, MorphToRegistrar, RelationField};
pub use text::{Text, Textarea};
