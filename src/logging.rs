//! Logging initialization for the CLI.
//!
//! Diagnostics go to stderr through `tracing`; command output stays on stdout.

use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `info`, or `debug`
/// with `verbose`. Calling it twice is a no-op.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact();

    // Fails only if a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

fn default_directive(level: Level) -> String {
    format!("notes_manifest={}", level.to_string().to_lowercase())
}
