//! Diagnostic logging
//!
//! Monitoring systems read the first line of stdout, so everything logged
//! here goes to stderr.

use std::env;
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins over the default level, which is `warn`, or `debug` when
/// `verbose` is set.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(env::var("RUST_LOG").unwrap_or_default());

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
