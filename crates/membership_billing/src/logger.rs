//! Logging setup and re-exports.

pub use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber, reading the filter from
/// `RUST_LOG` and falling back to the given level.
///
/// Safe to call more than once; later calls are no-ops.
pub fn setup(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
