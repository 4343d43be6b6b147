use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter, e.g. `QUIZ_LOG=services=debug`.
pub const LOG_ENV: &str = "QUIZ_LOG";

/// Install a stderr subscriber so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}
