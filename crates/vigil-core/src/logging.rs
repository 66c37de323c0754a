use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber for a service.
///
/// The level comes from `LOG_LEVEL`-style configuration; an explicit
/// `RUST_LOG` in the environment still wins so operators can turn on
/// per-module filtering without redeploying. Unknown level strings fall
/// back to `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(level: &str) {
    let level = match level.trim().to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
