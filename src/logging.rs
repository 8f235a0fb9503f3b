//! Diagnostic logging.
//!
//! Diagnostics go to stderr so that stdout stays reserved for the transcript
//! and task tables. The filter defaults to `warn` and can be overridden with
//! `RUST_LOG` (for example `RUST_LOG=taskchat=debug`).

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second initialization (e.g. from an embedding binary) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
