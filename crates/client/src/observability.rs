//! Diagnostic logging setup.
//!
//! The library itself only emits `tracing` events; embedding applications
//! (or tests) call [`init_tracing`] once to install a subscriber. Filtering
//! follows `RUST_LOG`, defaulting to `info` for this crate.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a formatted `tracing` subscriber. Safe to call repeatedly; only
/// the first call has an effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("studia_client=info"));

        // try_init: the embedding app may already have a subscriber.
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
