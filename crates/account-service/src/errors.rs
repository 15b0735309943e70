//! Account service error types.
//!
//! All errors map to appropriate HTTP status codes via the `IntoResponse` impl.
//! Each kind carries a fixed client-facing message; underlying causes are
//! logged server-side and never echoed. The one exception is validation,
//! which returns the list of offending fields.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending JSON field.
    pub field: String,

    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Account service error type.
///
/// Maps to HTTP status codes:
/// - AccountNotFound, TravelerNotFound: 404 Not Found
/// - AuthorizationDenied: 401 Unauthorized
/// - OversizedValue: 413 Payload Too Large
/// - DuplicateUsername: 409 Conflict
/// - DependencyFailure: 424 Failed Dependency
/// - Validation: 422 Unprocessable Entity
/// - BadRequest: 400 Bad Request
/// - Database, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account not found")]
    AccountNotFound,

    #[error("Traveler not found")]
    TravelerNotFound,

    #[error("Authorization denied")]
    AuthorizationDenied,

    #[error("Field value too large")]
    OversizedValue,

    #[error("Username already in use")]
    DuplicateUsername,

    #[error("Dependency failure: {0}")]
    DependencyFailure(String),

    #[error("Validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal,
}

impl AccountError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            AccountError::AccountNotFound | AccountError::TravelerNotFound => 404,
            AccountError::AuthorizationDenied => 401,
            AccountError::OversizedValue => 413,
            AccountError::DuplicateUsername => 409,
            AccountError::DependencyFailure(_) => 424,
            AccountError::Validation(_) => 422,
            AccountError::BadRequest(_) => 400,
            AccountError::Database(_) | AccountError::Internal => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AccountError::AccountNotFound => (
                StatusCode::NOT_FOUND,
                "ACCOUNT_NOT_FOUND",
                "Account was unable to be found",
            ),
            AccountError::TravelerNotFound => (
                StatusCode::NOT_FOUND,
                "TRAVELER_NOT_FOUND",
                "Traveler was unable to be found",
            ),
            AccountError::AuthorizationDenied => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "You do not have the level of access required for this resource",
            ),
            AccountError::OversizedValue => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "OVERSIZED_VALUE",
                "Entity Field value was too large for the DB",
            ),
            AccountError::DuplicateUsername => (
                StatusCode::CONFLICT,
                "DUPLICATE_USERNAME",
                "The Username provided is already in use please select another",
            ),
            AccountError::DependencyFailure(reason) => {
                tracing::warn!(target: "acct.dependency", reason = %reason, "Authentication service request failed");
                (
                    StatusCode::FAILED_DEPENDENCY,
                    "DEPENDENCY_FAILED",
                    "This request required another request to be processed but the subsequent request could not completed.",
                )
            }
            AccountError::Validation(fields) => {
                for field in fields {
                    tracing::debug!(target: "acct.validation", field = %field.field, message = %field.message, "Field failed validation");
                }
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_FAILED",
                    "Request validation failed",
                )
            }
            AccountError::BadRequest(reason) => {
                tracing::debug!(target: "acct.request", reason = %reason, "Rejected malformed request");
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", "Malformed request")
            }
            AccountError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "acct.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected untracked exception has occured please notify an Admin",
                )
            }
            AccountError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An unexpected untracked exception has occured please notify an Admin",
            ),
        };

        let details = match self {
            AccountError::Validation(fields) => Some(fields),
            _ => None,
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) = "Bearer realm=\"utopia-accounts\"".parse() {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

/// Convert sqlx errors to AccountError
impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        AccountError::Database(err.to_string())
    }
}
