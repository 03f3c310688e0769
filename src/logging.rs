// Diagnostics setup for the CLI

use tracing_subscriber::EnvFilter;

/// Env var holding the tracing filter (e.g. `info`, `typed_record_store=debug`)
pub const ENV_LOG: &str = "RECORD_STORE_LOG";

/// Install a stderr fmt subscriber; a second call is a no-op
pub fn init() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
