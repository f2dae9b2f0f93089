use brankas_core::config::LogFormat;
use brankas_core::Config;
use tracing::Subscriber;
use tracing_subscriber::{fmt::format::Format, layer::SubscriberExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. `TraceLayer` emits its request and
/// response events at DEBUG.
pub const DEFAULT_FILTER: &str = "brankas=debug,tower_http=debug";

/// Build the process subscriber from configuration without installing it.
pub fn build_subscriber(config: &Config) -> Box<dyn Subscriber + Send + Sync> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            ),
        ),
        LogFormat::Compact => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .event_format(Format::default().compact().with_target(false)),
            ),
        ),
    }
}

/// Install the subscriber built from `config` as the global default.
pub fn init_telemetry(config: &Config) -> Result<(), anyhow::Error> {
    tracing::subscriber::set_global_default(build_subscriber(config))
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::debug!(format = ?config.log_format, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_subscriber_for_each_format() {
        let mut config = Config::for_tests("secret");
        for format in [LogFormat::Json, LogFormat::Compact] {
            config.log_format = format;
            let subscriber = build_subscriber(&config);
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(format = ?format, "subscriber works");
            });
        }
    }

    #[test]
    fn test_default_filter_shows_request_traces() {
        let subscriber = tracing_subscriber::registry().with(EnvFilter::new(DEFAULT_FILTER));
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(
                target: "tower_http::trace::on_request",
                tracing::Level::DEBUG
            ));
            assert!(tracing::enabled!(
                target: "tower_http::trace::on_response",
                tracing::Level::DEBUG
            ));
            assert!(tracing::enabled!(
                target: "brankas_api::handlers::upload",
                tracing::Level::DEBUG
            ));
        });
    }
}
