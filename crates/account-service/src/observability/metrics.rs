//! Metrics definitions for the account service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `acct_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods
//! - `endpoint`: normalized paths (numeric segments collapsed to `{id}`)
//! - `status`: success, error, timeout
//! - `operation`: bounded by repository code
//! - `outcome` / `decision`: bounded by code

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("acct_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("acct_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("acct_auth_request".to_string()),
            &[
                0.010, 0.025, 0.050, 0.100, 0.200, 0.500, 1.000, 2.000, 5.000, 10.000,
            ],
        )
        .map_err(|e| format!("Failed to set auth request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion.
///
/// Metric: `acct_http_requests_total`, `acct_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("acct_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("acct_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Collapse numeric path segments so `/accounts/17/travelers/3` becomes
/// `/accounts/{id}/travelers/{id}`.
fn normalize_endpoint(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let digits = segment.strip_prefix('-').unwrap_or(segment);
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// Database Metrics
// ============================================================================

/// Record a repository query.
///
/// Metric: `acct_db_queries_total`, `acct_db_query_duration_seconds`
/// Labels: `operation`, `status`
pub fn record_db_query(operation: &'static str, status: &'static str, duration: Duration) {
    histogram!("acct_db_query_duration_seconds",
        "operation" => operation,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("acct_db_queries_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);
}

// ============================================================================
// Authentication Service Metrics
// ============================================================================

/// Record a call to the authentication service.
///
/// Metric: `acct_auth_requests_total`, `acct_auth_request_duration_seconds`
/// Labels: `outcome` (success, rejected, unavailable, error)
pub fn record_auth_request(outcome: &'static str, duration: Duration) {
    histogram!("acct_auth_request_duration_seconds",
        "outcome" => outcome
    )
    .record(duration.as_secs_f64());

    counter!("acct_auth_requests_total",
        "outcome" => outcome
    )
    .increment(1);
}

/// Record an authorization guard decision.
///
/// Metric: `acct_authz_decisions_total`
/// Labels: `decision` (allow, deny), `basis` (admin, owner, none)
pub fn record_authorization_decision(decision: &'static str, basis: &'static str) {
    counter!("acct_authz_decisions_total",
        "decision" => decision,
        "basis" => basis
    )
    .increment(1);
}
