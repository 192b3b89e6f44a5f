//! Tracing setup shared by the service binaries

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// The filter is read from `RUST_LOG` and falls back to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
