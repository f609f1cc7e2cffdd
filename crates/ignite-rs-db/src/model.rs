//! Model trait and relation introspection.
//!
//! The form engine binds every form to a [`ModelType`]. When a form declares a
//! relation by accessor name, the engine instantiates a throwaway model through
//! the descriptor and asks it which kind of [`Relation`] the accessor returns.
//! This is the only point where the model schema is consulted at
//! configuration time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of relation an accessor on a model returns.
///
/// Not every kind is representable as a form field; the mapping from kind to
/// relation field type lives in the form engine's relation map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// Inverse of a one-to-one or one-to-many relation.
    BelongsTo,
    /// Many-to-many via a pivot table.
    BelongsToMany,
    /// One-to-one.
    HasOne,
    /// One-to-many.
    HasMany,
    /// One-to-one through an intermediate model.
    HasOneThrough,
    /// One-to-many through an intermediate model.
    HasManyThrough,
    /// Polymorphic one-to-one.
    MorphOne,
    /// Polymorphic one-to-many.
    MorphMany,
    /// Inverse of a polymorphic relation; the target type is stored per row.
    MorphTo,
    /// Polymorphic many-to-many.
    MorphToMany,
    /// Inverse of a polymorphic many-to-many.
    MorphedByMany,
}

impl RelationKind {
    /// Every relation kind, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::BelongsTo,
        Self::BelongsToMany,
        Self::HasOne,
        Self::HasMany,
        Self::HasOneThrough,
        Self::HasManyThrough,
        Self::MorphOne,
        Self::MorphMany,
        Self::MorphTo,
        Self::MorphToMany,
        Self::MorphedByMany,
    ];

    /// Returns the human-readable, lower-camel-cased name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BelongsTo => "belongsTo",
            Self::BelongsToMany => "belongsToMany",
            Self::HasOne => "hasOne",
            Self::HasMany => "hasMany",
            Self::HasOneThrough => "hasOneThrough",
            Self::HasManyThrough => "hasManyThrough",
            Self::MorphOne => "morphOne",
            Self::MorphMany => "morphMany",
            Self::MorphTo => "morphTo",
            Self::MorphToMany => "morphToMany",
            Self::MorphedByMany => "morphedByMany",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A live relation descriptor returned by a model's relation accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// The relation kind.
    pub kind: RelationKind,
    /// The related model name (e.g. "comment"). Empty for `MorphTo`.
    pub related: String,
    /// The foreign key column, if the relation uses one.
    pub foreign_key: Option<String>,
}

impl Relation {
    /// Creates a relation descriptor of the given kind.
    pub fn new(kind: RelationKind, related: impl Into<String>) -> Self {
        Self {
            kind,
            related: related.into(),
            foreign_key: None,
        }
    }

    /// Sets the foreign key column.
    #[must_use]
    pub fn foreign_key(mut self, key: impl Into<String>) -> Self {
        self.foreign_key = Some(key.into());
        self
    }

    /// Shorthand for a `BelongsTo` relation.
    pub fn belongs_to(related: impl Into<String>) -> Self {
        Self::new(RelationKind::BelongsTo, related)
    }

    /// Shorthand for a `BelongsToMany` relation.
    pub fn belongs_to_many(related: impl Into<String>) -> Self {
        Self::new(RelationKind::BelongsToMany, related)
    }

    /// Shorthand for a `HasOne` relation.
    pub fn has_one(related: impl Into<String>) -> Self {
        Self::new(RelationKind::HasOne, related)
    }

    /// Shorthand for a `HasMany` relation.
    pub fn has_many(related: impl Into<String>) -> Self {
        Self::new(RelationKind::HasMany, related)
    }

    /// Shorthand for a `MorphMany` relation.
    pub fn morph_many(related: impl Into<String>) -> Self {
        Self::new(RelationKind::MorphMany, related)
    }

    /// Shorthand for a `MorphTo` relation.
    pub fn morph_to() -> Self {
        Self::new(RelationKind::MorphTo, "")
    }
}

/// The core trait for models the form engine can be bound to.
///
/// # Examples
///
/// ```
/// use ignite_rs_db::model::{Model, ModelType, Relation};
///
/// #[derive(Default)]
/// struct Post;
///
/// impl Model for Post {
///     fn model_name(&self) -> &'static str { "post" }
///
///     fn relation(&self, name: &str) -> Option<Relation> {
///         match name {
///             "comments" => Some(Relation::has_many("comment")),
///             _ => None,
///         }
///     }
/// }
///
/// let post = ModelType::of::<Post>();
/// assert_eq!(post.name(), "post");
/// ```
pub trait Model: Send + Sync + 'static {
    /// Returns the model name in lowercase (e.g. "post").
    fn model_name(&self) -> &'static str;

    /// Invokes the named relation accessor, returning its descriptor.
    ///
    /// Returns `None` when the model has no accessor with that name.
    fn relation(&self, name: &str) -> Option<Relation> {
        let _ = name;
        None
    }

    /// Returns the column used for manual ordering in index tables.
    fn order_column(&self) -> &'static str {
        "order_column"
    }
}

/// The package's own model for standalone forms (settings pages and the like).
///
/// Forms bound to this model express relations through dedicated fields
/// instead of model accessors, so relation resolution is refused for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormModel;

impl Model for FormModel {
    fn model_name(&self) -> &'static str {
        "form"
    }
}

/// A cheap, copyable descriptor of a model type.
///
/// Holds the model name and a factory producing fresh instances, so forms can
/// stay non-generic while still instantiating their bound model.
#[derive(Clone, Copy)]
pub struct ModelType {
    name: &'static str,
    factory: fn() -> Box<dyn Model>,
    internal: bool,
}

impl ModelType {
    /// Creates the descriptor for `M`.
    pub fn of<M: Model + Default>() -> Self {
        fn make<M: Model + Default>() -> Box<dyn Model> {
            Box::new(M::default())
        }
        Self {
            name: M::default().model_name(),
            factory: make::<M>,
            internal: false,
        }
    }

    /// Creates the descriptor for the internal [`FormModel`].
    pub fn form_model() -> Self {
        Self {
            internal: true,
            ..Self::of::<FormModel>()
        }
    }

    /// Returns the model name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` for the internal [`FormModel`].
    pub const fn is_form_model(&self) -> bool {
        self.internal
    }

    /// Creates a fresh, unsaved instance of the model.
    pub fn instantiate(&self) -> Box<dyn Model> {
        (self.factory)()
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.internal == other.internal
    }
}

impl Eq for ModelType {}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("name", &self.name)
            .field("internal", &self.internal)
            .finish()
    }
}
