use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks debug for this crate
/// and warnings elsewhere, and the quiet default only shows errors.
/// `color` is off for `--no-color`, keeping escapes out of the log lines.
pub fn init_logger(verbose: bool, color: bool) {
    let default_filter = if verbose { "blogdesk=debug,warn" } else { "error" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    // try_init: tests and embedders may already have a subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr) // Keep stdout for command output
                .with_target(false)
                .with_ansi(color)
                .compact(),
        )
        .try_init();
}
