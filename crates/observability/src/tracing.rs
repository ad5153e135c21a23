//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Build the level filter: `RUST_LOG` when set, else `default_level`.
fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize tracing for the process.
///
/// `json` selects structured JSON lines; otherwise the compact human format.
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with(default_level: &str, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
