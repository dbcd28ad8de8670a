#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. Stdout carries protocol frames only.
///
/// `RUST_LOG`-style directives are accepted as well as a bare level.
pub fn init_logging(directives: &str) {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
