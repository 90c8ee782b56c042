//! Diagnostic logging setup.
//!
//! The conversion report is plain text on stdout (see [`output`](crate::output)).
//! `tracing` events from the pipeline go to stderr so they never interleave
//! with a piped `--json` report.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the logging subsystem.
///
/// `verbose` enables DEBUG level; otherwise only warnings and errors are
/// shown. The `RUST_LOG` environment variable overrides both.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}
