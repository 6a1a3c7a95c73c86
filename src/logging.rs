//! Structured logging setup for the binary.
//!
//! Logs go to stderr so stdout only carries recommendations.

use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "warn,song_recommender=info";

/// Initialize logging once. `verbose` raises this crate to `debug`.
pub fn init_logging(verbose: bool) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if verbose {
                EnvFilter::new("warn,song_recommender=debug")
            } else {
                EnvFilter::new(DEFAULT_FILTER)
            }
        });

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_filter(filter),
        );

        // Another subscriber may already be installed (e.g. by a test harness).
        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}
