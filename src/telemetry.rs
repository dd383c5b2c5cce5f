//! Tracing subscriber setup with optional OTLP export

use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::LoggingConfig;

const SERVICE_NAME: &str = "itinerary-planner";

/// Keeps the exporters alive; flushes them on drop
#[derive(Default)]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shut down tracer provider: {e}");
        }
        if let Some(provider) = self.logger_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shut down logger provider: {e}");
        }
    }
}

fn resource() -> Resource {
    Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_attribute(KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")))
        .build()
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig) -> Result<TelemetryGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    let fmt_layer = if config.format == "json" {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().pretty().with_target(true).boxed()
    };

    let mut guard = TelemetryGuard::default();
    let mut otel_layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if let Some(endpoint) = &config.otlp_endpoint {
        let base = endpoint.trim_end_matches('/');

        let span_exporter = SpanExporter::builder()
            .with_http()
            .with_endpoint(format!("{base}/v1/traces"))
            .build()
            .context("Failed to build OTLP span exporter")?;
        let tracer_provider = SdkTracerProvider::builder()
            .with_batch_exporter(span_exporter)
            .with_resource(resource())
            .build();
        let tracer = tracer_provider.tracer(SERVICE_NAME);
        otel_layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());

        let log_exporter = LogExporter::builder()
            .with_http()
            .with_endpoint(format!("{base}/v1/logs"))
            .build()
            .context("Failed to build OTLP log exporter")?;
        let logger_provider = SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .with_resource(resource())
            .build();
        otel_layers.push(OpenTelemetryTracingBridge::new(&logger_provider).boxed());

        guard.tracer_provider = Some(tracer_provider);
        guard.logger_provider = Some(logger_provider);
    }

    tracing_subscriber::registry()
        .with(otel_layers)
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(endpoint) = &config.otlp_endpoint {
        tracing::info!("Exporting traces and logs to {}", endpoint);
    }

    Ok(guard)
}
