//! Prometheus metrics for the relay.
//!
//! Metric names follow `postback_{phase}_{name}` with a `_total` suffix on
//! counters. Recording is a no-op until a recorder is installed, so tests and
//! one-shot CLI runs need no setup.

pub mod relay;

pub use relay::RelayMetrics;

use std::sync::Once;
use tracing::{info, warn};

static INIT: Once = Once::new();

/// Install the Prometheus exporter when `POSTBACK_METRICS_ADDR` is set.
///
/// Idempotent. Must be called from inside a tokio runtime since the exporter
/// spawns its HTTP listener there.
pub fn init_metrics() {
    INIT.call_once(|| {
        let addr_str = match std::env::var("POSTBACK_METRICS_ADDR") {
            Ok(v) if !v.trim().is_empty() => v,
            _ => {
                info!("POSTBACK_METRICS_ADDR not set, metrics exporter disabled");
                return;
            }
        };

        let addr = match addr_str.trim().parse::<std::net::SocketAddr>() {
            Ok(addr) => addr,
            Err(e) => {
                warn!("Invalid metrics addr '{}': {}", addr_str, e);
                return;
            }
        };

        match metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
        {
            Ok(()) => {
                RelayMetrics::register_metrics();
                info!("Prometheus exporter listening at http://{}/metrics", addr);
            }
            Err(e) => warn!("Failed to install Prometheus exporter: {}", e),
        }
    });
}

/// Implemented by each group of metrics so names and help texts live together.
pub trait PhaseMetrics {
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("postback_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("postback_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
