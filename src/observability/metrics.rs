//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ssr_requests_total` (counter): requests by destination, status
//! - `ssr_request_duration_seconds` (histogram): latency by destination
//! - `ssr_translation_fallbacks_total` (counter): lookups served by `en` instead
//! - `ssr_document_fetch_failures_total` (counter): base document/asset upstream failures
//! - `ssr_translation_reloads_total` (counter): reloads by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::i18n::Language;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_request(destination: &'static str, status: u16, start: Instant) {
    counter!("ssr_requests_total", "destination" => destination, "status" => status.to_string())
        .increment(1);
    histogram!("ssr_request_duration_seconds", "destination" => destination)
        .record(start.elapsed().as_secs_f64());
}

/// Unsupported codes share one `other` label to keep cardinality bounded.
pub fn record_translation_fallback(requested: &str) {
    let requested = Language::from_code(requested).map_or("other", Language::code);
    counter!("ssr_translation_fallbacks_total", "requested" => requested).increment(1);
}

pub fn record_document_fetch_failure(source: &'static str) {
    counter!("ssr_document_fetch_failures_total", "source" => source).increment(1);
}

pub fn record_translation_reload(outcome: &'static str) {
    counter!("ssr_translation_reloads_total", "outcome" => outcome).increment(1);
}
