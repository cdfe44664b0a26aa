//! Log subscriber setup.
//!
//! Library code only emits `tracing` events. Hosts that want them printed
//! call [`init_tracing`] once at startup.

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` if set and valid, else `fallback`, else `info`.
pub fn build_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global fmt subscriber.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case nothing changes.
pub fn init_tracing(fallback_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(fallback_filter))
        .with_target(false)
        .try_init()
        .is_ok()
}
