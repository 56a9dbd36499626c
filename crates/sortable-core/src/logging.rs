//! Logging bootstrap for hosts embedding the engine.

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "sortable=debug,sortable_core=info";

/// Install a `tracing-subscriber` fmt subscriber.
///
/// Honours `RUST_LOG` and falls back to [`DEFAULT_FILTER`].
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Like [`init`] but does nothing if a global subscriber is already set.
///
/// Useful in tests where several cases race to install a subscriber.
pub fn try_init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
