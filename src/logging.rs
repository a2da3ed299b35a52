//! Logging setup shared by the client binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter for a debug level when `RUST_LOG` is not set.
pub fn default_filter(debug_level: u8) -> &'static str {
    match debug_level {
        0 => "jrpc_client=info",
        1 => "jrpc_client=debug",
        _ => "jrpc_client=trace",
    }
}

/// Install the global subscriber. Logs go to stderr so stdout carries only
/// reply text.
pub fn init(debug_level: u8) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(debug_level).into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
