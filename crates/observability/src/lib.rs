//! Process-wide tracing setup.

/// Initialize tracing with JSON output at `info`, overridable via `RUST_LOG`.
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    tracing::init_with("info", true);
}

pub use self::tracing::init_with;

/// Subscriber configuration (filter, output format).
pub mod tracing;
