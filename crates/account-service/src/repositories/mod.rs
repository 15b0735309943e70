//! Repository layer for the account service.
//!
//! All queries are parameterized. Each repository call is timed into the
//! `acct_db_query*` metrics.

mod accounts;
mod travelers;

pub use accounts::AccountsRepository;
pub use travelers::TravelersRepository;

use crate::observability::metrics::record_db_query;
use std::time::Instant;

/// Record the outcome and latency of a single repository query.
fn observe<T>(operation: &'static str, start: Instant, result: &Result<T, sqlx::Error>) {
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query(operation, status, start.elapsed());
}
