//! Observability module for the account service.
//!
//! Provides metrics definitions and recording helpers.

pub mod metrics;
