//! HTTP request handlers for the account service.

pub mod accounts;
pub mod health;
pub mod metrics;
pub mod travelers;

pub use accounts::{delete_account, get_account, list_admins, list_users, update_account};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use travelers::{create_traveler, delete_traveler, list_travelers, update_traveler};

use crate::errors::AccountError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// Parse a JSON request body, reporting malformed input as `BadRequest`.
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AccountError> {
    serde_json::from_slice(body).map_err(|e| AccountError::BadRequest(e.to_string()))
}

/// Path parameters; a segment that does not parse is a `BadRequest`.
#[derive(Debug)]
pub struct ParsedPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ParsedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AccountError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AccountError::BadRequest(rejection.body_text()))?;
        Ok(ParsedPath(value))
    }
}

/// Query string; a value that does not parse is a `BadRequest`.
#[derive(Debug)]
pub struct ParsedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ParsedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AccountError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AccountError::BadRequest(rejection.body_text()))?;
        Ok(ParsedQuery(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::AccountRequest;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct LimitQuery {
        limit: Option<u32>,
    }

    async fn echo_id(ParsedPath(id): ParsedPath<i32>) -> String {
        id.to_string()
    }

    async fn echo_pair(ParsedPath((a, b)): ParsedPath<(i32, i32)>) -> String {
        format!("{a}/{b}")
    }

    async fn echo_limit(ParsedQuery(query): ParsedQuery<LimitQuery>) -> String {
        query.limit.unwrap_or_default().to_string()
    }

    fn test_app() -> Router {
        Router::new()
            .route("/accounts/:id", get(echo_id))
            .route("/accounts/:id/travelers/:tid", get(echo_pair))
            .route("/list", get(echo_limit))
    }

    async fn send(uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_parsed_path_accepts_integers() {
        let (status, body) = send("/accounts/-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"-1");

        let (status, body) = send("/accounts/1/travelers/7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"1/7");
    }

    #[tokio::test]
    async fn test_parsed_path_non_integer_is_json_bad_request() {
        for uri in ["/accounts/abc", "/accounts/1/travelers/x"] {
            let (status, body) = send(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");

            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"]["code"], "BAD_REQUEST", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_parsed_query_bad_value_is_json_bad_request() {
        let (status, body) = send("/list?limit=12").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"12");

        let (status, body) = send("/list?limit=many").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[test]
    fn test_parse_json_body_accepts_valid_json() {
        let request: AccountRequest =
            parse_json_body(br#"{"username":"a","email":"b"}"#).unwrap();
        assert_eq!(request.username.as_deref(), Some("a"));
    }

    #[test]
    fn test_parse_json_body_rejects_malformed_json() {
        let result: Result<AccountRequest, _> = parse_json_body(b"{not json");
        assert!(matches!(result, Err(AccountError::BadRequest(_))));
    }

    #[test]
    fn test_parse_json_body_rejects_empty_body() {
        let result: Result<AccountRequest, _> = parse_json_body(b"");
        assert!(matches!(result, Err(AccountError::BadRequest(_))));
    }
}
