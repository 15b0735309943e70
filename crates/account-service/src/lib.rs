//! Account Service Library
//!
//! Manages Utopia accounts and the travelers attached to them:
//!
//! - Account lookup, role-scoped listings, updates and deactivation
//! - Traveler create, update, list and delete per account
//! - Caller identity delegated to the remote authentication service
//! - Two-tier authorization (admins act on anything, users on their own account)
//!
//! # Architecture
//!
//! Handler -> Service -> Repository:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Credential extraction and the authorization guard
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Data models
//! - `observability` - Prometheus metrics
//! - `repositories` - PostgreSQL access
//! - `routes` - Axum router setup
//! - `services` - Business logic and the authentication service client

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
