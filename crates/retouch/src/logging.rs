//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout carries only command status lines.
//! `RUST_LOG` takes precedence over the level chosen here.

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

/// Output encoding for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

static INIT_ONCE: Once = Once::new();

/// Filter used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "retouch=debug" } else { "retouch=info" }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(format: Format, verbose: bool) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);
        // A subscriber may already be set (tests); keep it.
        let _ = match format {
            Format::Text => builder.finish().try_init(),
            Format::Json => builder.json().finish().try_init(),
        };
    });
}
