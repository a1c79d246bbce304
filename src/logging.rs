use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "WORKFLOW_CPM_LOG";

/// Installs the global fmt subscriber. An explicit `level` wins over
/// `WORKFLOW_CPM_LOG`; with neither, `info` is used. Calling this twice is a
/// no-op.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
