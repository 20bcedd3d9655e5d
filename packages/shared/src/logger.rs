//! Logging setup utilities for the relay binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the binary's own crate, this shared crate and
/// `tower_http` (request tracing). The level can be overridden using the
/// `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "relay-server", "relay-client")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use relay_shared::logger::setup_logger;
///
/// setup_logger("relay-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the fallback filter directive used when `RUST_LOG` is unset.
fn default_filter(binary_name: &str, level: &str) -> String {
    format!(
        "{}={level},{}={level},tower_http={level}",
        binary_name.replace('-', "_"),
        env!("CARGO_PKG_NAME").replace('-', "_"),
    )
}
