use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes structured logging.
/// Logs are JSON on stdout; `RUST_LOG` controls the level (default `info`).
/// Setting `APP_ENVIRONMENT=local` switches to human-readable output.
pub fn init_telemetry() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let local = std::env::var("APP_ENVIRONMENT")
        .map(|env| env.eq_ignore_ascii_case("local"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if local {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stdout)
                    .json(),
            )
            .init();
    }
}
