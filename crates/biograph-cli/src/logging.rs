//! Tracing setup. Logs go to stderr so answers on stdout stay pipeable.

use tracing_subscriber::EnvFilter;

/// Pick the filter directive.
///
/// `--verbose` wins, then `RUST_LOG`, then the configured level.
pub fn filter_directive(verbose: bool, rust_log: Option<&str>, configured: &str) -> String {
    if verbose {
        return "debug".to_string();
    }
    match rust_log.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directive) => directive.to_string(),
        None => configured.to_string(),
    }
}

/// Install the global subscriber. Calling twice is harmless.
pub fn init(verbose: bool, configured: &str) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(verbose, rust_log.as_deref(), configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
