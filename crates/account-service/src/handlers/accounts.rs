//! Account handlers.
//!
//! - `GET /accounts/{accountNumber}` - fetch one account
//! - `GET /accounts/users?nameFilter=` - list user accounts (admin)
//! - `GET /accounts/admins?nameFilter=` - list admin accounts (admin)
//! - `PUT /accounts/{accountNumber}` - update or create an account
//! - `DELETE /accounts/{accountNumber}` - deactivate an account

use super::{parse_json_body, ParsedPath, ParsedQuery};
use crate::auth::Credential;
use crate::errors::AccountError;
use crate::models::{Account, AccountRequest, RoleScope};
use crate::routes::AppState;
use crate::services::AccountDirectory;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

/// Query parameters of the role-scoped listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "nameFilter")]
    pub name_filter: Option<String>,
}

/// Handler for GET /accounts/{accountNumber}
///
/// # Response
///
/// - 200 OK: the account
/// - 401 Unauthorized: bad credential or not owner/admin
/// - 404 Not Found: caller or target unknown
/// - 424 Failed Dependency: authentication service unavailable
#[instrument(skip_all, name = "acct.handlers.accounts.get", fields(account_number = account_number))]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    credential: Credential,
    ParsedPath(account_number): ParsedPath<i32>,
) -> Result<Json<Account>, AccountError> {
    let account = AccountDirectory::get_by_id(
        &state.pool,
        state.auth_client.as_ref(),
        account_number,
        &credential,
    )
    .await?;
    Ok(Json(account))
}

/// Handler for GET /accounts/users
#[instrument(skip_all, name = "acct.handlers.accounts.list_users")]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    credential: Credential,
    ParsedQuery(query): ParsedQuery<ListQuery>,
) -> Result<Json<Vec<Account>>, AccountError> {
    list_scope(&state, RoleScope::Users, query, &credential).await
}

/// Handler for GET /accounts/admins
#[instrument(skip_all, name = "acct.handlers.accounts.list_admins")]
pub async fn list_admins(
    State(state): State<Arc<AppState>>,
    credential: Credential,
    ParsedQuery(query): ParsedQuery<ListQuery>,
) -> Result<Json<Vec<Account>>, AccountError> {
    list_scope(&state, RoleScope::Admins, query, &credential).await
}

async fn list_scope(
    state: &AppState,
    scope: RoleScope,
    query: ListQuery,
    credential: &Credential,
) -> Result<Json<Vec<Account>>, AccountError> {
    let accounts = AccountDirectory::list(
        &state.pool,
        state.auth_client.as_ref(),
        scope,
        query.name_filter.as_deref(),
        credential,
    )
    .await?;
    Ok(Json(accounts))
}

/// Handler for PUT /accounts/{accountNumber}
///
/// The path account number wins over any `accountNumber` in the body.
///
/// # Response
///
/// - 200 OK: the saved account
/// - 400 Bad Request: body is not valid JSON
/// - 401 Unauthorized: bad credential, not owner/admin, or role escalation
/// - 409 Conflict: username already in use
/// - 413 Payload Too Large: username or email too long
/// - 422 Unprocessable Entity: missing fields or unknown role
/// - 424 Failed Dependency: authentication service unavailable
#[instrument(skip_all, name = "acct.handlers.accounts.update", fields(account_number = account_number))]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    credential: Credential,
    ParsedPath(account_number): ParsedPath<i32>,
    body: Bytes,
) -> Result<Json<Account>, AccountError> {
    let request: AccountRequest = parse_json_body(&body)?;

    let account = AccountDirectory::update(
        &state.pool,
        state.auth_client.as_ref(),
        account_number,
        request,
        &credential,
    )
    .await?;
    Ok(Json(account))
}

/// Handler for DELETE /accounts/{accountNumber}
///
/// Any request body is ignored.
#[instrument(skip_all, name = "acct.handlers.accounts.delete", fields(account_number = account_number))]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    credential: Credential,
    ParsedPath(account_number): ParsedPath<i32>,
) -> Result<StatusCode, AccountError> {
    AccountDirectory::deactivate(
        &state.pool,
        state.auth_client.as_ref(),
        account_number,
        &credential,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
