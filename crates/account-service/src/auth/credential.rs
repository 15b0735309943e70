//! Caller credential extracted from the `Authorization` header.

use crate::errors::AccountError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use secrecy::{ExposeSecret, SecretString};

/// Marker a credential must contain before it is forwarded anywhere.
pub const BEARER_MARKER: &str = "Bearer";

/// Raw `Authorization` header value, kept secret.
///
/// The value is passed through verbatim to the authentication service.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    /// True if the credential contains the literal `Bearer` marker anywhere.
    pub fn has_bearer_marker(&self) -> bool {
        self.0.expose_secret().contains(BEARER_MARKER)
    }

    pub fn secret(&self) -> &SecretString {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
{
    type Rejection = AccountError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or_else(|| {
                tracing::debug!(target: "acct.auth.credential", "Missing Authorization header");
                AccountError::AuthorizationDenied
            })?;

        let raw = header.to_str().map_err(|_| {
            tracing::debug!(target: "acct.auth.credential", "Authorization header is not valid ASCII");
            AccountError::AuthorizationDenied
        })?;

        Ok(Credential::new(raw))
    }
}
