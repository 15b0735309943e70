//! Authentication service HTTP client.
//!
//! The account service never inspects tokens itself. It forwards the
//! caller's `Authorization` header to the authentication service's
//! `getSecurityAccount` endpoint and trusts the username that comes back.
//!
//! # Failure mapping
//!
//! - 401 / 403 from the remote: the credential was rejected
//!   (`AuthorizationDenied`)
//! - transport error, timeout, 5xx, any other non-2xx, or a body that is
//!   not an account payload: `DependencyFailure`
//!
//! No retries.

use crate::auth::Credential;
use crate::errors::AccountError;
use crate::observability::metrics::record_auth_request;
use reqwest::{header, Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{instrument, warn};

/// Connect timeout for the authentication service.
const AUTH_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Path of the identity lookup on the authentication service.
const SECURITY_ACCOUNT_PATH: &str = "/getSecurityAccount";

/// Account payload returned by the authentication service.
///
/// Only `username` is used; every other field is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteIdentity {
    #[serde(default)]
    pub username: Option<String>,
}

/// Trait for authentication service lookups (enables mocking).
#[async_trait::async_trait]
pub trait AuthClientTrait: Send + Sync {
    /// Ask the authentication service who `credential` belongs to.
    async fn fetch_security_account(
        &self,
        credential: &Credential,
    ) -> Result<RemoteIdentity, AccountError>;
}

/// HTTP client for the authentication service.
#[derive(Clone)]
pub struct AuthClient {
    /// HTTP client with configured timeouts.
    client: Client,

    /// Base URL without a trailing slash.
    base_url: String,
}

impl AuthClient {
    /// Create a new authentication service client.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: String, request_timeout_seconds: u64) -> Result<Self, AccountError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout_seconds))
            .connect_timeout(Duration::from_secs(AUTH_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                tracing::error!(target: "acct.services.auth_client", error = %e, "Failed to build HTTP client");
                AccountError::Internal
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up the account behind `credential`.
    ///
    /// # Errors
    ///
    /// - `AccountError::AuthorizationDenied` if the remote rejects the credential
    /// - `AccountError::DependencyFailure` for every other failure
    #[instrument(skip_all, name = "acct.services.auth_client.fetch_security_account")]
    pub async fn fetch_security_account(
        &self,
        credential: &Credential,
    ) -> Result<RemoteIdentity, AccountError> {
        let url = format!("{}{}", self.base_url, SECURITY_ACCOUNT_PATH);
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, credential.secret().expose_secret())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                record_auth_request("unavailable", start.elapsed());
                warn!(target: "acct.services.auth_client", error = %e, "Authentication service request failed");
                AccountError::DependencyFailure(format!("authentication service unreachable: {e}"))
            })?;

        let result = Self::handle_response(response).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(AccountError::AuthorizationDenied) => "rejected",
            Err(_) => "error",
        };
        record_auth_request(outcome, start.elapsed());

        result
    }

    /// Map the remote status and body to an identity or an error.
    async fn handle_response(response: reqwest::Response) -> Result<RemoteIdentity, AccountError> {
        let status = response.status();

        if status.is_success() {
            // A JSON `null` body means the remote knows no account.
            let identity: Option<RemoteIdentity> = response.json().await.map_err(|e| {
                warn!(target: "acct.services.auth_client", error = %e, "Failed to parse authentication service response");
                AccountError::DependencyFailure(format!("unparseable identity payload: {e}"))
            })?;
            Ok(identity.unwrap_or_default())
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::debug!(target: "acct.services.auth_client", status = %status, "Authentication service rejected credential");
            Err(AccountError::AuthorizationDenied)
        } else {
            warn!(target: "acct.services.auth_client", status = %status, "Unexpected authentication service response");
            Err(AccountError::DependencyFailure(format!(
                "authentication service returned {status}"
            )))
        }
    }
}

#[async_trait::async_trait]
impl AuthClientTrait for AuthClient {
    async fn fetch_security_account(
        &self,
        credential: &Credential,
    ) -> Result<RemoteIdentity, AccountError> {
        self.fetch_security_account(credential).await
    }
}

/// Mock authentication client for tests.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Behavior {
        Identify,
        Reject,
        Fail,
    }

    /// Mock authentication client that answers without a network call.
    pub struct MockAuthClient {
        username: Option<String>,
        behavior: Behavior,
        call_count: AtomicUsize,
    }

    impl MockAuthClient {
        /// Create a mock that identifies every caller as `username`.
        pub fn returning(username: &str) -> Self {
            Self {
                username: Some(username.to_string()),
                behavior: Behavior::Identify,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Create a mock whose payload carries no username.
        pub fn anonymous() -> Self {
            Self {
                username: None,
                behavior: Behavior::Identify,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Create a mock that rejects every credential.
        pub fn rejecting() -> Self {
            Self {
                username: None,
                behavior: Behavior::Reject,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Create a mock that behaves like an unreachable service.
        pub fn failing() -> Self {
            Self {
                username: None,
                behavior: Behavior::Fail,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Get the number of calls made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AuthClientTrait for MockAuthClient {
        async fn fetch_security_account(
            &self,
            _credential: &Credential,
        ) -> Result<RemoteIdentity, AccountError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            match self.behavior {
                Behavior::Identify => Ok(RemoteIdentity {
                    username: self.username.clone(),
                }),
                Behavior::Reject => Err(AccountError::AuthorizationDenied),
                Behavior::Fail => Err(AccountError::DependencyFailure(
                    "Mock authentication client error".to_string(),
                )),
            }
        }
    }
}
