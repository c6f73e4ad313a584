//! Process-wide tracing setup.
//!
//! `RUST_LOG` is the per-target filter knob; when it is unset or invalid the
//! given default level applies.

use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. A second call is a no-op.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
