//! Tracing setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Map `-v` counts to a default filter; `RUST_LOG` wins when set.
fn filter_for(verbosity: u8) -> EnvFilter {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialise the fmt subscriber once. Later calls are no-ops, which keeps
/// tests that exercise the CLI path from panicking.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
