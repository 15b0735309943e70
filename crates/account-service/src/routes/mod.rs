//! HTTP routes for the account service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::AuthClientTrait;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Service configuration.
    pub config: Config,

    /// Client for the authentication service.
    pub auth_client: Arc<dyn AuthClientTrait>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe with database ping - public
/// - `/metrics` - Prometheus metrics endpoint - public
/// - `/accounts/...` - Account and traveler endpoints (caller resolved per request)
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
/// - CORS for the configured origin, if any
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let cors = cors_layer(state.config.cors_allowed_origin.as_deref());

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Static segments take priority over `:account_number`.
    let account_routes = Router::new()
        .route("/accounts/users", get(handlers::list_users))
        .route("/accounts/admins", get(handlers::list_admins))
        .route(
            "/accounts/:account_number",
            get(handlers::get_account)
                .put(handlers::update_account)
                .delete(handlers::delete_account),
        )
        .route(
            "/accounts/:account_number/travelers",
            get(handlers::list_travelers).post(handlers::create_traveler),
        )
        .route(
            "/accounts/:account_number/travelers/:traveler_id",
            put(handlers::update_traveler).delete(handlers::delete_traveler),
        )
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. CorsLayer - Answer preflights for the configured origin
    // 4. http_metrics_middleware - Record ALL responses (outermost)
    let mut router = public_routes
        .merge(metrics_routes)
        .merge(account_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    router.layer(middleware::from_fn(http_metrics_middleware))
}

/// CORS layer for a single allowed origin.
fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    let origin = match origin.parse::<HeaderValue>() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(target: "acct.routes", error = %e, "Ignoring invalid CORS origin");
            return None;
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]),
    )
}
