//! # ignite-rs-core
//!
//! Core types, settings, and error types for the ignite-rs admin toolkit.
//! This crate has no dependency on the rest of the workspace and provides the
//! foundation for the persistence boundary and the form engine.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Toolkit settings (route prefix, locales, media conversions)
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Text helpers shared by the engine

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{IgniteError, IgniteResult};
pub use settings::Settings;
