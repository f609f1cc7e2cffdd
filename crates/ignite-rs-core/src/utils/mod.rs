//! Utility functions for the ignite-rs toolkit.
//!
//! - [`text`]: String helpers used when deriving labels and identifiers.

pub mod text;
