use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Install the process-wide subscriber for the Showcase binaries.
///
/// `RUST_LOG` wins over `fallback` (e.g. "debug,showcase=trace"). Records emitted
/// through the `log` facade by the core crate are bridged into `tracing`.
/// Calling this again after a subscriber is installed does nothing.
pub fn init_with_default(fallback: &str) {
    let _ = LogTracer::init();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).compact())
        .try_init();
}

pub fn init() {
    init_with_default(DEFAULT_DIRECTIVE);
}

