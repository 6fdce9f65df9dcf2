use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct RelayMetrics;

impl RelayMetrics {
    pub fn record_postback_received() {
        ::metrics::counter!(phase_metric!(counter, "relay", "postbacks_received")).increment(1);
    }

    pub fn record_postback_dropped() {
        ::metrics::counter!(phase_metric!(counter, "relay", "postbacks_dropped")).increment(1);
    }

    /// Record one outbound attempt and how long it took.
    pub fn record_event_dispatched(succeeded: bool, duration_secs: f64) {
        let outcome = if succeeded { "ok" } else { "failed" };
        ::metrics::counter!(
            phase_metric!(counter, "relay", "events_dispatched"),
            "outcome" => outcome
        )
        .increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "relay", "dispatch_duration_seconds"))
            .record(duration_secs);
    }
}

impl PhaseMetrics for RelayMetrics {
    fn register_metrics() {
        use metrics::{describe_counter, describe_histogram};

        for doc in Self::metrics_documentation() {
            match doc.metric_type {
                MetricType::Counter => describe_counter!(doc.name, doc.help),
                MetricType::Histogram => describe_histogram!(doc.name, doc.help),
            }
        }
        tracing::debug!(phase = Self::phase_name(), "Registered metric descriptions");
    }

    fn phase_name() -> &'static str {
        "relay"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "relay", "postbacks_received"),
                metric_type: MetricType::Counter,
                help: "Inbound postbacks received",
            },
            MetricDoc {
                name: phase_metric!(counter, "relay", "postbacks_dropped"),
                metric_type: MetricType::Counter,
                help: "Inbound postbacks rejected by validation",
            },
            MetricDoc {
                name: phase_metric!(counter, "relay", "events_dispatched"),
                metric_type: MetricType::Counter,
                help: "Outbound events attempted, labelled by outcome",
            },
            MetricDoc {
                name: phase_metric!(histogram, "relay", "dispatch_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Duration of outbound tracker requests",
            },
        ]
    }
}
