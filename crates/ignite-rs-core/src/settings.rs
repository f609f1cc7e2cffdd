//! Settings for the ignite-rs toolkit.
//!
//! [`Settings`] holds the startup configuration the form engine reads: the
//! admin base URL used to normalize route prefixes, the locales translatable
//! fields expand into, and the default media conversions.
//! Settings are loaded once (see [`settings_loader`](crate::settings_loader))
//! and passed by reference; nothing mutates them after startup.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Locale configuration for translatable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatableSettings {
    /// Locales every translatable field is stored in, in display order.
    pub locales: Vec<String>,
    /// The locale used when a translation is missing.
    pub fallback_locale: String,
}

impl Default for TranslatableSettings {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string()],
            fallback_locale: "en".to_string(),
        }
    }
}

/// Default image conversions, keyed by conversion name.
///
/// Each entry is `[width, height, sharpen]`.
pub type MediaConversionSettings = IndexMap<String, [u32; 3]>;

fn default_media_conversions() -> MediaConversionSettings {
    let mut conversions = IndexMap::new();
    conversions.insert("sm".to_string(), [300, 300, 10]);
    conversions.insert("md".to_string(), [500, 500, 10]);
    conversions.insert("lg".to_string(), [900, 900, 10]);
    conversions.insert("xl".to_string(), [1400, 1400, 10]);
    conversions
}

/// The complete set of toolkit settings.
///
/// # Examples
///
/// ```
/// use ignite_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.route_prefix, "admin");
/// assert_eq!(settings.url("posts"), "http://localhost/admin/posts");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,
    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,

    // ── Routing ──────────────────────────────────────────────────────

    /// The public URL of the hosting application, without trailing slash.
    pub app_url: String,
    /// The path segment every admin route lives under.
    pub route_prefix: String,

    // ── Internationalization ─────────────────────────────────────────

    /// Locales for translatable fields.
    pub translatable: TranslatableSettings,

    // ── Media ────────────────────────────────────────────────────────

    /// Default image conversions applied to media attachments.
    pub media_conversions: MediaConversionSettings,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            app_url: "http://localhost".to_string(),
            route_prefix: "admin".to_string(),
            translatable: TranslatableSettings::default(),
            media_conversions: default_media_conversions(),
            extra: HashMap::new(),
        }
    }
}

impl Settings {
    /// Builds an absolute admin URL for `path`.
    ///
    /// `url("")` yields the admin base URL, which the form engine strips from
    /// route prefixes that were passed in absolute form.
    pub fn url(&self, path: &str) -> String {
        let base = format!(
            "{}/{}",
            self.app_url.trim_end_matches('/'),
            self.route_prefix.trim_matches('/')
        );
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base
        } else {
            format!("{base}/{path}")
        }
    }

    /// Returns the configured translatable locales.
    pub fn locales(&self) -> &[String] {
        &self.translatable.locales
    }
}
