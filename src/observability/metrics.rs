//! Metrics collection and exposition.
//!
//! # Metrics
//! - `adtech_requests_total` (counter): requests by method, path, status
//! - `adtech_request_duration_seconds` (histogram): latency distribution
//! - `adtech_source_registrations_total` (counter): by response kind
//! - `adtech_trigger_registrations_total` (counter): by conversion type
//! - `adtech_trigger_rejections_total` (counter): invalid conversion requests
//! - `adtech_reports_received_total` (counter): by report kind
//!
//! Recording is a no-op until a recorder is installed, so tests and
//! metrics-disabled runs pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::measurement::ConversionType;
use crate::reports::ReportKind;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("adtech_requests_total", &labels).increment(1);
    metrics::histogram!("adtech_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_source_registration(kind: &'static str) {
    metrics::counter!("adtech_source_registrations_total", "kind" => kind).increment(1);
}

pub fn record_trigger_registration(conversion: ConversionType) {
    metrics::counter!(
        "adtech_trigger_registrations_total",
        "conversion_type" => conversion.as_str()
    )
    .increment(1);
}

pub fn record_trigger_rejection() {
    metrics::counter!("adtech_trigger_rejections_total").increment(1);
}

pub fn record_report(kind: ReportKind) {
    metrics::counter!("adtech_reports_received_total", "kind" => kind.as_str()).increment(1);
}

/// Middleware recording request count and latency per matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &path, response.status().as_u16(), start);
    response
}
