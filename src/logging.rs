use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Environment variable overriding the log filter (`info`, `debug`, `spendcast=trace`, ...).
pub const LOG_LEVEL_ENV: &str = "SPENDCAST_LOG_LEVEL";

fn resolve_env_filter(verbose: bool) -> tracing_subscriber::EnvFilter {
    if verbose {
        return tracing_subscriber::EnvFilter::new("debug");
    }
    if let Ok(level) = std::env::var(LOG_LEVEL_ENV)
        && let Ok(filter) = tracing_subscriber::EnvFilter::try_new(level)
    {
        return filter;
    }
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Install the global subscriber. Records go to stderr so that stdout
/// only carries the per-user progress lines.
///
/// Filter resolution: `--verbose` forces `debug`, then `SPENDCAST_LOG_LEVEL`,
/// then `RUST_LOG`, then `info`.
pub fn init(verbose: bool) {
    let console_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = tracing_subscriber::registry()
        .with(resolve_env_filter(verbose))
        .with(console_layer)
        .try_init();
}
