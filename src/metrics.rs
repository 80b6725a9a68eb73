// src/metrics.rs
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and register the series the service
    /// emits, so they show up on /metrics before their first increment.
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_counter!("mention_requests_total", "Search requests by source.");
        describe_counter!("mentions_cache_hits_total", "Cache hits on (source, query).");
        describe_counter!("mentions_cache_misses_total", "Cache misses on (source, query).");
        describe_counter!(
            "rate_limit_rejections_total",
            "Requests rejected by the fixed-window limiter."
        );
        describe_counter!("source_results_total", "Mentions parsed per source.");
        describe_counter!("feed_errors_total", "Forum feeds skipped after fetch/parse errors.");
        describe_histogram!("source_parse_ms", "Provider payload parse time in milliseconds.");

        Self { handle }
    }

    /// Router exposing `/metrics` in the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
