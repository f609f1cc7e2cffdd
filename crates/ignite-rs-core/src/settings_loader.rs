//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults). The format follows
//!    the file extension.
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `IGNITE_DEBUG` | `debug` |
//! | `IGNITE_LOG_LEVEL` | `log_level` |
//! | `IGNITE_APP_URL` | `app_url` |
//! | `IGNITE_ROUTE_PREFIX` | `route_prefix` |
//! | `IGNITE_LOCALES` | `translatable.locales` (comma-separated) |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use ignite_rs_core::settings_loader;
//!
//! let settings = settings_loader::from_file_with_env("config/ignite.toml").unwrap();
//! ```

use std::path::Path;

use serde_json::Value;

use crate::error::IgniteError;
use crate::settings::Settings;

/// A configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// TOML, the default for `.toml` and extension-less files.
    Toml,
    /// JSON.
    Json,
}

impl Format {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    fn parse(self, source: &str) -> Result<Value, IgniteError> {
        let parsed = match self {
            Self::Toml => toml::from_str::<toml::Value>(source)
                .map_err(|e| e.to_string())
                .and_then(|value| serde_json::to_value(value).map_err(|e| e.to_string())),
            Self::Json => serde_json::from_str(source).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| {
            IgniteError::ConfigurationError(format!("Failed to parse {}: {e}", self.label()))
        })
    }
}

/// Loads settings from a string in `format`.
///
/// Keys missing from the source keep their default values; tables are
/// merged key by key.
pub fn from_str(source: &str, format: Format) -> Result<Settings, IgniteError> {
    let overrides = format.parse(source)?;
    let defaults = serde_json::to_value(Settings::default()).map_err(|e| {
        IgniteError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;
    serde_json::from_value(merge_json(defaults, overrides)).map_err(|e| {
        IgniteError::ConfigurationError(format!(
            "Failed to deserialize settings from {}: {e}",
            format.label()
        ))
    })
}

/// Loads settings from a TOML string.
pub fn from_toml_str(source: &str) -> Result<Settings, IgniteError> {
    from_str(source, Format::Toml)
}

/// Loads settings from a JSON string.
pub fn from_json_str(source: &str) -> Result<Settings, IgniteError> {
    from_str(source, Format::Json)
}

/// Loads settings from a file, picking the format from its extension.
pub fn from_file(path: impl AsRef<Path>) -> Result<Settings, IgniteError> {
    let path = path.as_ref();
    let format = Format::from_path(path);
    let source = std::fs::read_to_string(path).map_err(|e| {
        IgniteError::ConfigurationError(format!(
            "Failed to read {} file '{}': {e}",
            format.label(),
            path.display()
        ))
    })?;
    from_str(&source, format)
}

/// Loads settings from a file, then applies environment overrides.
pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Settings, IgniteError> {
    let mut settings = from_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads the default settings with environment overrides applied.
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

type Override = fn(&mut Settings, String);

const ENV_OVERRIDES: &[(&str, Override)] = &[
    ("IGNITE_DEBUG", |settings: &mut Settings, raw: String| {
        settings.debug = matches!(raw.to_ascii_lowercase().as_str(), "true" | "1" | "yes");
    }),
    ("IGNITE_LOG_LEVEL", |settings: &mut Settings, raw: String| settings.log_level = raw),
    ("IGNITE_APP_URL", |settings: &mut Settings, raw: String| settings.app_url = raw),
    ("IGNITE_ROUTE_PREFIX", |settings: &mut Settings, raw: String| settings.route_prefix = raw),
    ("IGNITE_LOCALES", |settings: &mut Settings, raw: String| {
        let locales: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|locale| !locale.is_empty())
            .map(ToString::to_string)
            .collect();
        if !locales.is_empty() {
            settings.translatable.locales = locales;
        }
    }),
];

/// Applies the `IGNITE_*` environment variables that are set.
pub fn apply_env_overrides(settings: &mut Settings) {
    for (var, apply) in ENV_OVERRIDES {
        if let Ok(raw) = std::env::var(var) {
            tracing::debug!(var, "applying environment override");
            apply(settings, raw);
        }
    }
}

/// Deep-merges `overrides` into `base`; objects merge per key, anything
/// else is replaced.
fn merge_json(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Object(mut merged), Value::Object(overrides)) => {
            for (key, value) in overrides {
                let value = match merged.remove(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            Value::Object(merged)
        }
        (_, value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            route_prefix = "backend"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.route_prefix, "backend");
        // Defaults preserved
        assert_eq!(settings.app_url, "http://localhost");
    }

    #[test]
    fn test_from_toml_str_locales() {
        let toml = r#"
            [translatable]
            locales = ["en", "de"]
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.locales(), ["en".to_string(), "de".to_string()]);
        assert_eq!(settings.translatable.fallback_locale, "en");
    }

    #[test]
    fn test_from_toml_str_media_conversions() {
        let toml = r#"
            [media_conversions]
            thumb = [100, 80, 5]
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.media_conversions["thumb"], [100, 80, 5]);
        assert_eq!(settings.media_conversions["sm"], [300, 300, 10]);
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.route_prefix, "admin");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let err = from_toml_str("debug = [").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{"app_url": "https://shop.test", "log_level": "debug"}"#;
        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.app_url, "https://shop.test");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.url(""), "https://shop.test/admin");
    }

    #[test]
    fn test_from_json_str_wrong_type() {
        let err = from_json_str(r#"{"debug": "yes please"}"#).unwrap_err();
        assert!(matches!(err, IgniteError::ConfigurationError(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = from_file("/nonexistent/ignite.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read TOML file"));
        let err = from_file("/nonexistent/ignite.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read JSON file"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("ignite.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("ignite.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("ignite")), Format::Toml);
    }

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"a": {"b": 1, "c": 2}});
        let over = serde_json::json!({"a": {"c": 3}});
        assert_eq!(merge_json(base, over), serde_json::json!({"a": {"b": 1, "c": 3}}));
    }
}
