use tracing_subscriber::EnvFilter;

/// Logs always go to stderr; stdout carries protocol messages. The editor host
/// captures stderr verbatim, so `ansi` is off in bridge mode.
pub fn init(log_level: &str, ansi: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .try_init();
}
