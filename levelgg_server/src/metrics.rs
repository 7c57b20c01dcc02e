//! Prometheus metrics for the registration and draft engines.
//!
//! Nothing is recorded until [`init_metrics`] installs the exporter; before
//! that every helper is a no-op.
//!
//! # Metrics
//!
//! - `http_requests_total`, `http_request_duration_ms`
//! - `registrations_created_total`, `registrations_removed_total`
//! - `registration_status_changes_total`
//! - `player_counter_failures_total`: counter procedure calls that failed and
//!   left `registered_players` out of sync
//! - `draft_players_assigned_total`, `draft_failed_assignments_total`
//! - `captaincy_transfers_total`
//!
//! ```rust,no_run
//! use levelgg_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr = SocketAddr::from(([127, 0, 0, 1], 9090));
//! metrics::init_metrics(addr).unwrap();
//! metrics::registrations_created();
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter with a scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Registration Metrics
// ============================================================================

pub fn registrations_created() {
    metrics::counter!("registrations_created_total").increment(1);
}

/// `via` is `withdraw` or `delete`
pub fn registrations_removed(via: &str) {
    metrics::counter!("registrations_removed_total",
        "via" => via.to_string()
    )
    .increment(1);
}

pub fn registration_status_changes(status: &str) {
    metrics::counter!("registration_status_changes_total",
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn player_counter_failures(operation: &str) {
    metrics::counter!("player_counter_failures_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}

// ============================================================================
// Draft Metrics
// ============================================================================

pub fn draft_players_assigned(assignment_type: &str, count: usize) {
    metrics::counter!("draft_players_assigned_total",
        "assignment_type" => assignment_type.to_string()
    )
    .increment(count as u64);
}

pub fn draft_failed_assignments(assignment_type: &str, count: usize) {
    metrics::counter!("draft_failed_assignments_total",
        "assignment_type" => assignment_type.to_string()
    )
    .increment(count as u64);
}

// ============================================================================
// Team Metrics
// ============================================================================

/// `outcome` is `transferred` or `rolled_back`
pub fn captaincy_transfers(outcome: &str) {
    metrics::counter!("captaincy_transfers_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
