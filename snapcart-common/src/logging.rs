//! Tracing subscriber setup shared by snapcart binaries

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes priority; otherwise the configured level is applied to the
/// calling crate and to `tower_http`. A bare level ("debug") is expanded to
/// `"<crate>=debug,tower_http=debug"`, a full directive is used as-is.
pub fn init_tracing(crate_name: &str, logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(crate_name, &logging.level)));

    // Ignore the error if a subscriber is already set (tests, embedding)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn default_directive(crate_name: &str, level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{crate_name}={level},tower_http={level}")
    }
}
