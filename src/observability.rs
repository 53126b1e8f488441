use opentelemetry_sdk::trace::Tracer;
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::configuration::LogFormat;

pub fn get_subscriber(
    name: &str,
    env_filter: &str,
    format: LogFormat,
) -> impl Subscriber + Sync + Send {
    // Building the jaeger layer, if needed
    let jaeger = build_jaeger(name);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    let (plain, json) = match format {
        LogFormat::Plain => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };

    Registry::default()
        .with(env_filter)
        .with(plain)
        .with(json)
        .with(jaeger)
}

/// Install the subscriber globally, `log` records included
pub fn init_subscriber(
    subscriber: impl Subscriber + Sync + Send + 'static,
) -> Result<(), TryInitError> {
    subscriber.try_init()
}

/// Flush the spans still waiting for export
pub fn shutdown() {
    opentelemetry::global::shutdown_tracer_provider();
}

fn build_jaeger<S>(name: &str) -> Option<OpenTelemetryLayer<S, Tracer>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    std::env::var("JAEGER_ENABLED").ok()?;

    match opentelemetry_jaeger::new_agent_pipeline()
        .with_service_name(name)
        .install_batch(opentelemetry_sdk::runtime::Tokio)
    {
        Ok(tracer) => Some(tracing_opentelemetry::layer().with_tracer(tracer)),
        Err(error) => {
            // No subscriber is installed yet
            eprintln!("Could not install the jaeger pipeline: {error}");
            None
        }
    }
}
