//! Logging bootstrap
//!
//! Installs a `tracing` fmt subscriber. `RUST_LOG` takes precedence over
//! the configured level.

use crate::config::LogLevel;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which makes
/// this safe to call from every host entry point.
pub fn init(level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Logging initialized at {:?}", level);
    }
    installed
}
