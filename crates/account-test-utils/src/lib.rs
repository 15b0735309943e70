//! Test utilities for the account service.
//!
//! - [`TestAccountServer`] spawns the real router on a random port with a
//!   wiremock server standing in for the authentication service
//! - [`fixtures`] inserts accounts and travelers directly
//!
//! Callers are identified by bearer credentials of the form returned by
//! [`bearer_for`]; [`TestAccountServer::identify`] teaches the mock
//! authentication service which username each credential maps to.

pub mod fixtures;
pub mod server_harness;

pub use fixtures::{seed_account, seed_traveler};
pub use server_harness::{bearer_for, TestAccountServer};
