//! Structured logging configuration.
//!
//! The library crate logs through the `log` facade; `init` installs a
//! `tracing` subscriber that also picks those records up.

use levelgg::PlayerId;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging. Levels come from `RUST_LOG`.
///
/// # Example
///
/// ```no_run
/// use levelgg_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// ```
/// use levelgg_server::logging::log_security_event;
///
/// log_security_event("rejected_token", None, "Authentication required");
/// ```
pub fn log_security_event(event_type: &str, player_id: Option<PlayerId>, message: &str) {
    tracing::warn!(
        event_type = event_type,
        player_id = player_id.map(|id| id.to_string()),
        "SECURITY: {}",
        message
    );
}
