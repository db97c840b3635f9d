//! Diagnostic logging for the CLI.
//!
//! The core library logs through the `log` facade; the subscriber installed
//! here picks those records up through its `tracing-log` bridge.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the subscriber. Reads `RUST_LOG`, defaulting to `warn`.
/// Output goes to stderr so stdout stays clean JSON.
///
/// ```bash
/// RUST_LOG=treelist_core=debug treelist write '[{"uuid":"ABAA","order":3}]'
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
