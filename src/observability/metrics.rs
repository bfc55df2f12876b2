//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_requests_total` (counter): requests by method, status
//! - `site_request_duration_seconds` (histogram): latency distribution
//! - `site_rate_limited_total` (counter): throttled requests by route
//! - `site_cross_origin_requests_total` (counter): foreign `Origin` headers seen
//! - `site_assistant_answers_total` (counter): answers by synthesis rule
//! - `site_bookings_total` (counter): accepted booking requests
//!
//! Recording is a no-op until a recorder is installed, so handlers and tests
//! can call these freely.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "site_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("site_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(route: &'static str) {
    counter!("site_rate_limited_total", "route" => route).increment(1);
}

pub fn record_cross_origin() {
    counter!("site_cross_origin_requests_total").increment(1);
}

pub fn record_assistant_answer(rule: &'static str) {
    counter!("site_assistant_answers_total", "rule" => rule).increment(1);
}

pub fn record_booking() {
    counter!("site_bookings_total").increment(1);
}
