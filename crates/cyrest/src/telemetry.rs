use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with an env-based filter and bridge `log` records.
///
/// - Reads `RUST_LOG` for level directives (e.g., "info", "debug,cyrest_http=trace").
/// - Forwards `log` crate records to `tracing` via `LogTracer`, so the request
///   and response lines written by the HTTP logging hook show up here.
/// - Sets up a compact formatter to stdout.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    init_with_default("info");
}

/// Like [`init`], but with a caller-chosen filter when `RUST_LOG` is unset.
pub fn init_with_default(default_directives: &str) {
    let _ = LogTracer::init();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let fmt_layer = fmt::layer().with_target(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
