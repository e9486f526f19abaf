//! Metrics collection and exposition.
//!
//! # Metrics
//! - `admission_decisions_total` (counter): decisions by outcome and reason
//! - `rate_store_entries` (gauge): live rate records after the last sweep
//! - `rate_store_evictions_total` (counter): records removed by sweeps
//! - `http_requests_total` (counter): protected-endpoint responses by status
//!
//! # Design Decisions
//! - `metrics` facade; without an installed recorder every call is a no-op
//! - Prometheus exporter serves its own HTTP listener

use std::net::SocketAddr;

use ::metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::admission::AdmissionResult;

/// Install the Prometheus recorder and start its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_decision(result: &AdmissionResult) {
    let (outcome, reason) = match result {
        AdmissionResult::Admitted => ("admitted", "none"),
        AdmissionResult::Rejected(r) => ("rejected", r.reason.as_str()),
    };
    counter!("admission_decisions_total", "outcome" => outcome, "reason" => reason).increment(1);
}

pub fn record_sweep(evicted: usize, remaining: usize) {
    counter!("rate_store_evictions_total").increment(evicted as u64);
    gauge!("rate_store_entries").set(remaining as f64);
}

pub fn record_response(endpoint: &str, status: u16) {
    counter!(
        "http_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
