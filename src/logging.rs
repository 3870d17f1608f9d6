//! Diagnostic logging for spotdash.
//!
//! User-facing status lines go through the `info!`/`success!`/`warning!`/`error!`
//! macros. This module sets up `tracing` for everything below that: request
//! traces, poll failures and session invalidation. Events are written to stderr
//! so they never interleave with tables printed on stdout.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "spotdash=warn";

/// Initialize the logging system.
///
/// The log level can be controlled via the `RUST_LOG` environment variable,
/// e.g. `RUST_LOG=spotdash=debug`.
pub fn init_logging() -> crate::Res<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Log the outcome of a Spotify API request.
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::debug!(operation = $operation, "API request successful"),
            Err(e) => tracing::warn!(operation = $operation, error = %e, "API request failed"),
        }
    };
}
