//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Log filter environment variable; `RUST_LOG` is read when it is unset.
pub const LOG_ENV: &str = "VIBEPROMPT_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Later calls are no-ops.
pub fn init() {
    let directives = filter_directives(std::env::var(LOG_ENV).ok(), std::env::var("RUST_LOG").ok());
    let filter =
        EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn filter_directives(primary: Option<String>, fallback: Option<String>) -> String {
    primary
        .filter(|value| !value.trim().is_empty())
        .or_else(|| fallback.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}
