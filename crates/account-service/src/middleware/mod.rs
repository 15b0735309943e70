//! HTTP middleware for the account service.
//!
//! - `http_metrics` - request metrics for every response

pub mod http_metrics;

pub use http_metrics::http_metrics_middleware;
