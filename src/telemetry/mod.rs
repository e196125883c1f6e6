//! Telemetry initialization: structured logging and metrics

pub mod metrics;

use crate::config::TelemetryConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise logging and, when enabled, the Prometheus recorder.
///
/// Returns `Some(PrometheusHandle)` when metrics are enabled so the hosting
/// application can render them on its own `/metrics` endpoint. Calling this
/// twice in one process is tolerated: the second subscriber install is a no-op.
pub fn init(config: &TelemetryConfig) -> Option<PrometheusHandle> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hireboard_core=info".into());

    let prometheus_handle = if config.metrics_enabled {
        match metrics::install_prometheus_recorder() {
            Ok(handle) => {
                metrics::describe_metrics();
                Some(handle)
            }
            Err(err) => {
                eprintln!("WARN: failed to install Prometheus recorder: {}", err);
                None
            }
        }
    } else {
        None
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.log_format == "json" {
        // Flatten event fields so `message` is top-level in each JSON line.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false);
        let _ = registry.with(fmt_layer).try_init();
    } else {
        let _ = registry.with(tracing_subscriber::fmt::layer()).try_init();
    }

    tracing::info!(service = %config.service_name, "telemetry initialised");
    prometheus_handle
}
