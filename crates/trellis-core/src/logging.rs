//! Logging setup built on `tracing-subscriber`.
//!
//! The framework itself only emits `tracing` events. Hosts that do not install
//! their own subscriber can call [`init`] once at startup.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,trellis_ui=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a formatting subscriber. Panics if a global subscriber is already set.
pub fn init() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Install a formatting subscriber if none is installed yet.
///
/// Returns `true` when this call installed the subscriber. Safe to call from
/// every test.
pub fn try_init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init()
        .is_ok()
}
