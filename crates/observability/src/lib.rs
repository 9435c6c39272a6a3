//! Tracing/logging setup shared by the API binary and tests.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide logging.
///
/// Emits JSON lines, filtered by `RUST_LOG`. The default filter keeps
/// per-statement sqlx logging out of the stream. Safe to call multiple
/// times; subsequent calls become no-ops.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init();
}
