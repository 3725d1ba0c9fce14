//! Tracing subscriber setup for the binary
//!
//! The library only emits events. Nothing is printed unless the binary
//! installs a subscriber through [`init_tracing`].

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable that overrides the CLI-derived filter
pub const LOG_ENV: &str = "LOTSIFT_LOG";

/// Install a stderr subscriber
///
/// `verbose` counts `-v` flags. `LOTSIFT_LOG` (or `RUST_LOG`) wins when set,
/// and accepts full `EnvFilter` directives.
///
/// # Errors
///
/// Returns `TryInitError` if a global subscriber is already installed.
pub fn init_tracing(verbose: u8, quiet: bool) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
}

/// Filter directive for the given verbosity
#[must_use]
pub const fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "lotsift=error",
        (false, 0) => "lotsift=warn",
        (false, 1) => "lotsift=info",
        (false, 2) => "lotsift=debug",
        (false, _) => "lotsift=trace",
    }
}
