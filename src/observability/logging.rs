//! Structured logging.
//!
//! Logs go to stderr so that stdout carries only the progress lines.
//! The filter is taken from `RUST_LOG` when set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is absent or invalid.
pub const DEFAULT_FILTER: &str = "simple_storage_client=info,simple_storage=info";

/// Initialize the global tracing subscriber.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
