//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_router_requests_total` (counter): requests by route and status
//! - `site_router_request_duration_seconds` (histogram): dispatch + endpoint time
//! - `site_router_not_found_total` (counter): paths no rule matched
//! - `site_router_reloads_total` (counter): table reloads by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Unnamed routes are labelled `unnamed` to keep label cardinality bounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a dispatched request.
pub fn record_request(method: &str, route: Option<&str>, status: u16, start: Instant) {
    let route = route.unwrap_or("unnamed").to_string();
    counter!(
        "site_router_requests_total",
        "method" => method.to_string(),
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("site_router_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record a path that matched no rule.
pub fn record_not_found(method: &str) {
    counter!("site_router_not_found_total", "method" => method.to_string()).increment(1);
}

/// Record a reload attempt.
pub fn record_reload(success: bool) {
    let outcome = if success { "applied" } else { "rejected" };
    counter!("site_router_reloads_total", "outcome" => outcome).increment(1);
}
