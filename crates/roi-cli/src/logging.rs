use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Logs go to stderr so stdout stays
/// parseable for json/csv output.
///
/// An explicit `--log-level` wins over `RUST_LOG`; an unparsable filter
/// falls back to the default rather than aborting the command.
pub fn init(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("failed to initialise logging: {e}");
    }
}
