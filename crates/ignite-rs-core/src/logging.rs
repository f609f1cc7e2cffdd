//! Logging integration for the ignite-rs toolkit.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating the per-request
//! span under which a form graph is built.

use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter comes from `RUST_LOG` when set, else `settings.log_level`. In
/// debug mode a pretty, human-readable format is used; otherwise structured
/// JSON with flattened event fields is emitted.
/// Installing a second subscriber is a no-op.
pub fn setup_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = if settings.debug {
        builder.with_file(true).with_line_number(true).pretty().try_init()
    } else {
        builder.json().flatten_event(true).try_init()
    };

    if installed.is_ok() {
        tracing::debug!(level = %settings.log_level, debug = settings.debug, "logging initialized");
    }
}

/// Creates a tracing span for one request's form pipeline.
///
/// # Examples
///
/// ```
/// use ignite_rs_core::logging::request_span;
///
/// let span = request_span("abc-123");
/// let _guard = span.enter();
/// tracing::info!("building form");
/// ```
pub fn request_span(request_id: &str) -> tracing::Span {
    tracing::info_span!("admin_request", id = request_id)
}
