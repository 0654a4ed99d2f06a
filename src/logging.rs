//! `tracing`/`tracing-subscriber` initialization for the CLI entry point.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global subscriber that reads its filter from `RUST_LOG`,
/// defaulting to `info`. Safe to call exactly once; the CLI entry point is
/// the only caller.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
