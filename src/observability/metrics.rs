//! Metrics collection and exposition.
//!
//! # Metrics
//! - `converter_requests_total` (counter): handled POST requests by outcome
//! - `converter_request_duration_seconds` (histogram): latency distribution
//! - `converter_upstream_calls_total` (counter): lookups by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished conversion request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "converter_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("converter_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record one call to the external conversion service.
pub fn record_upstream_call(outcome: &'static str) {
    metrics::counter!("converter_upstream_calls_total", "outcome" => outcome).increment(1);
}
