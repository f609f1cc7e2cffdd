//! Core error types for the ignite-rs toolkit.
//!
//! [`IgniteError`] covers the three kinds of form declaration errors
//! (invalid configuration, missing required attributes, undefined operations)
//! as well as the persistence and settings failures raised around the engine.

use thiserror::Error;

/// The primary error type for the ignite-rs toolkit.
///
/// Declaration errors ([`InvalidConfiguration`](Self::InvalidConfiguration),
/// [`MissingRequiredAttribute`](Self::MissingRequiredAttribute) and
/// [`UndefinedOperation`](Self::UndefinedOperation)) signal that a form
/// definition itself is wrong. They are never retried.
#[derive(Error, Debug)]
pub enum IgniteError {
    // ── Declaration errors ───────────────────────────────────────────

    /// A field, dependency, slot or relation was configured incorrectly.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A field was rendered before all of its required attributes were set.
    #[error(
        "Missing required attributes: [{}] for {field_type} field \"{field_id}\"",
        .missing.join(", ")
    )]
    MissingRequiredAttribute {
        /// Every required attribute that is absent, in declaration order.
        missing: Vec<String>,
        /// The short type tag of the incomplete field (e.g. `modal`).
        field_type: String,
        /// The id of the incomplete field.
        field_id: String,
    },

    /// A builder call named an operation the receiver does not provide.
    #[error("Call to undefined method {receiver}::{method}()")]
    UndefinedOperation {
        /// The receiver type, e.g. `Form` or `text`.
        receiver: String,
        /// The offending method name.
        method: String,
    },

    // ── Persistence ──────────────────────────────────────────────────

    /// A lookup expected exactly one record but found none.
    #[error("Object does not exist: {0}")]
    DoesNotExist(String),

    // ── Configuration ────────────────────────────────────────────────

    /// Settings could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IgniteError {
    /// Creates an [`UndefinedOperation`](Self::UndefinedOperation) error.
    pub fn undefined(receiver: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UndefinedOperation {
            receiver: receiver.into(),
            method: method.into(),
        }
    }

    /// Returns `true` for errors caused by a wrong form declaration.
    ///
    /// These should surface during development and never reach an end user.
    pub const fn is_developer_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_)
                | Self::MissingRequiredAttribute { .. }
                | Self::UndefinedOperation { .. }
        )
    }
}

impl From<serde_json::Error> for IgniteError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, IgniteError>`.
pub type IgniteResult<T> = Result<T, IgniteError>;
