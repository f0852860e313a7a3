use prometheus::{Histogram, IntCounter, IntCounterVec, IntGauge, Registry};

#[derive(Clone)]
pub struct ReorderMetrics {
    pub registry: Registry,
    pub evaluations_total: IntCounter,
    pub evaluation_duration_seconds: Histogram,
    pub alerts_active: IntGauge,
    pub alerts_emitted_total: IntCounter,
    pub alerts_retired_total: IntCounter,
    pub notification_failures_total: IntCounter,
    pub http_errors_total: IntCounterVec,
}

impl ReorderMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let evaluations_total = IntCounter::new(
            "reorder_evaluations_total",
            "Evaluation passes run over the inventory snapshot",
        ).unwrap();
        let evaluation_duration_seconds = Histogram::with_opts(
            prometheus::HistogramOpts::new(
                "reorder_evaluation_duration_seconds",
                "Duration of one evaluation pass"
            ).buckets(vec![0.0005,0.001,0.005,0.01,0.05,0.1,0.25,0.5])
        ).unwrap();
        let alerts_active = IntGauge::new(
            "reorder_alerts_active",
            "Active alerts after the latest evaluation pass",
        ).unwrap();
        let alerts_emitted_total = IntCounter::new(
            "reorder_alerts_emitted_total",
            "Alerts emitted across evaluation passes",
        ).unwrap();
        let alerts_retired_total = IntCounter::new(
            "reorder_alerts_retired_total",
            "Alerts retired because their condition cleared",
        ).unwrap();
        let notification_failures_total = IntCounter::new(
            "reorder_notification_failures_total",
            "Reorder webhook notification failures",
        ).unwrap();
        let http_errors_total = IntCounterVec::new(
            prometheus::Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)"
            ),
            &["service", "code", "status"]
        ).unwrap();
        let _ = registry.register(Box::new(evaluations_total.clone()));
        let _ = registry.register(Box::new(evaluation_duration_seconds.clone()));
        let _ = registry.register(Box::new(alerts_active.clone()));
        let _ = registry.register(Box::new(alerts_emitted_total.clone()));
        let _ = registry.register(Box::new(alerts_retired_total.clone()));
        let _ = registry.register(Box::new(notification_failures_total.clone()));
        let _ = registry.register(Box::new(http_errors_total.clone()));
        ReorderMetrics {
            registry,
            evaluations_total,
            evaluation_duration_seconds,
            alerts_active,
            alerts_emitted_total,
            alerts_retired_total,
            notification_failures_total,
            http_errors_total,
        }
    }
}

impl Default for ReorderMetrics {
    fn default() -> Self { Self::new() }
}
