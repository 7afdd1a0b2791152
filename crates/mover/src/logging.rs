#![forbid(unsafe_code)]

//! Structured JSON logging for hosts that have no subscriber of their own.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host's call. Hosts that want the engine's spans and events as JSON lines
//! on stderr can call [`init`] once at startup.
//!
//! ```bash
//! RUST_LOG=mover=debug,mover_core=trace my-host
//! ```

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// Install a global JSON subscriber.
///
/// Reads `RUST_LOG`; falls back to `default_filter` when unset or invalid.
/// Fails if a global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
}
