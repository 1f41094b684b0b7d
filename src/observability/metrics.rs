//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_resolutions_total` (counter): routing decisions by source (rule, fallback) and controller
//! - `router_requests_total` (counter): dispatched requests by status
//! - `router_request_duration_seconds` (histogram): dispatch latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::{RouteSource, RouteTarget};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_resolution(source: RouteSource, target: &RouteTarget) {
    ::metrics::counter!(
        "router_resolutions_total",
        "source" => source.as_str(),
        "controller" => target.controller.clone()
    )
    .increment(1);
}

pub fn record_request(status: u16, start: Instant) {
    ::metrics::counter!("router_requests_total", "status" => status.to_string()).increment(1);
    ::metrics::histogram!("router_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
