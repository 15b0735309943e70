//! Traveler handlers.
//!
//! - `GET /accounts/{accountNumber}/travelers`
//! - `POST /accounts/{accountNumber}/travelers`
//! - `PUT /accounts/{accountNumber}/travelers/{travelerId}`
//! - `DELETE /accounts/{accountNumber}/travelers/{travelerId}`

use super::{parse_json_body, ParsedPath};
use crate::auth::Credential;
use crate::errors::AccountError;
use crate::models::{Traveler, TravelerRequest};
use crate::routes::AppState;
use crate::services::TravelerDirectory;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /accounts/{accountNumber}/travelers
#[instrument(skip_all, name = "acct.handlers.travelers.list", fields(account_number = account_number))]
pub async fn list_travelers(
    State(state): State<Arc<AppState>>,
    credential: Credential,
    ParsedPath(account_number): ParsedPath<i32>,
) -> Result<Json<Vec<Traveler>>, AccountError> {
    let travelers = TravelerDirectory::list_for_account(
        &state.pool,
        state.auth_client.as_ref(),
        account_number,
        &credential,
    )
    .await?;
    Ok(Json(travelers))
}

/// Handler for POST /accounts/{accountNumber}/travelers
///
/// Returns 201 Created with the stored traveler.
#[instrument(skip_all, name = "acct.handlers.travelers.create", fields(account_number = account_number))]
pub async fn create_traveler(
    State(state): State<Arc<AppState>>,
    credential: Credential,
    ParsedPath(account_number): ParsedPath<i32>,
    body: Bytes,
) -> Result<(StatusCode, Json<Traveler>), AccountError> {
    let request: TravelerRequest = parse_json_body(&body)?;

    let traveler = TravelerDirectory::save(
        &state.pool,
        state.auth_client.as_ref(),
        account_number,
        None,
        request,
        &credential,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(traveler)))
}

/// Handler for PUT /accounts/{accountNumber}/travelers/{travelerId}
#[instrument(skip_all, name = "acct.handlers.travelers.update", fields(account_number = account_number, traveler_id = traveler_id))]
pub async fn update_traveler(
    State(state): State<Arc<AppState>>,
    credential: Credential,
    ParsedPath((account_number, traveler_id)): ParsedPath<(i32, i32)>,
    body: Bytes,
) -> Result<Json<Traveler>, AccountError> {
    let request: TravelerRequest = parse_json_body(&body)?;

    let traveler = TravelerDirectory::save(
        &state.pool,
        state.auth_client.as_ref(),
        account_number,
        Some(traveler_id),
        request,
        &credential,
    )
    .await?;
    Ok(Json(traveler))
}

/// Handler for DELETE /accounts/{accountNumber}/travelers/{travelerId}
#[instrument(skip_all, name = "acct.handlers.travelers.delete", fields(account_number = account_number, traveler_id = traveler_id))]
pub async fn delete_traveler(
    State(state): State<Arc<AppState>>,
    credential: Credential,
    ParsedPath((account_number, traveler_id)): ParsedPath<(i32, i32)>,
) -> Result<StatusCode, AccountError> {
    TravelerDirectory::delete(
        &state.pool,
        state.auth_client.as_ref(),
        account_number,
        traveler_id,
        &credential,
    )
    .await?;
    Ok(StatusCode::OK)
}
