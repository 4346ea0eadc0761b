//! Diagnostics on stderr, silent unless `URL_SELECT_LOG` asks for more.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "URL_SELECT_LOG";

pub fn init_logging() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
