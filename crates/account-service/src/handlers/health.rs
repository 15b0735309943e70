//! Health check handler.

use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Health check handler.
///
/// Pings the database and reports the result. Always 200 so probes can read
/// the body.
///
/// ```json
/// { "status": "healthy", "database": "healthy" }
/// ```
#[instrument(skip_all, name = "acct.health.check")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    let status = if db_healthy { "healthy" } else { "unhealthy" };
    if !db_healthy {
        tracing::warn!(target: "acct.health", "Database ping failed");
    }

    Json(HealthResponse {
        status: status.to_string(),
        database: status.to_string(),
    })
}
