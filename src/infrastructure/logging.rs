use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. Logs go to stderr; stdout is
/// reserved for response bodies.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
