//! Caller identity resolution.
//!
//! Turns a raw credential into the caller's local [`Account`]:
//! 1. Reject credentials without the `Bearer` marker (no network, no storage)
//! 2. Ask the authentication service who the credential belongs to
//! 3. Load the returned username from the local store

use crate::auth::Credential;
use crate::errors::AccountError;
use crate::models::Account;
use crate::repositories::AccountsRepository;
use crate::services::auth_client::AuthClientTrait;
use sqlx::PgPool;
use tracing::instrument;

/// Service for resolving the caller behind a request.
pub struct IdentityResolver;

impl IdentityResolver {
    /// Resolve `credential` to the caller's account.
    ///
    /// # Errors
    ///
    /// - `AccountError::AuthorizationDenied` - credential lacks the marker or
    ///   the authentication service rejected it
    /// - `AccountError::DependencyFailure` - authentication service failed
    /// - `AccountError::AccountNotFound` - no local account for the username
    #[instrument(skip_all, name = "acct.services.identity.resolve_caller")]
    pub async fn resolve_caller(
        pool: &PgPool,
        auth_client: &dyn AuthClientTrait,
        credential: &Credential,
    ) -> Result<Account, AccountError> {
        if !credential.has_bearer_marker() {
            tracing::debug!(target: "acct.services.identity", "Credential missing Bearer marker");
            return Err(AccountError::AuthorizationDenied);
        }

        let identity = auth_client.fetch_security_account(credential).await?;

        let Some(username) = identity.username else {
            tracing::debug!(target: "acct.services.identity", "Authentication service returned no username");
            return Err(AccountError::AccountNotFound);
        };

        let caller = AccountsRepository::get_by_username(pool, &username)
            .await?
            .ok_or_else(|| {
                tracing::debug!(target: "acct.services.identity", "No local account for authenticated username");
                AccountError::AccountNotFound
            })?;

        tracing::debug!(
            target: "acct.services.identity",
            caller = caller.account_number,
            admin = caller.is_admin(),
            "Resolved caller"
        );
        Ok(caller)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::services::auth_client::mock::MockAuthClient;
    use sqlx::postgres::PgPoolOptions;

    /// Pool that never connects; any query fails.
    fn unreachable_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(100))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_marker_skips_remote_and_storage() {
        let mock = MockAuthClient::returning("admin");
        let pool = unreachable_pool();

        let result =
            IdentityResolver::resolve_caller(&pool, &mock, &Credential::new("Basic abc")).await;

        // A storage access would surface as a Database error instead.
        assert!(matches!(result, Err(AccountError::AuthorizationDenied)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_rejection_is_denied() {
        let mock = MockAuthClient::rejecting();
        let pool = unreachable_pool();

        let result =
            IdentityResolver::resolve_caller(&pool, &mock, &Credential::new("Bearer x")).await;
        assert!(matches!(result, Err(AccountError::AuthorizationDenied)));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_is_dependency_failure() {
        let mock = MockAuthClient::failing();
        let pool = unreachable_pool();

        let result =
            IdentityResolver::resolve_caller(&pool, &mock, &Credential::new("Bearer x")).await;
        assert!(matches!(result, Err(AccountError::DependencyFailure(_))));
    }

    #[tokio::test]
    async fn test_missing_username_is_not_found() {
        let mock = MockAuthClient::anonymous();
        let pool = unreachable_pool();

        let result =
            IdentityResolver::resolve_caller(&pool, &mock, &Credential::new("Bearer x")).await;
        assert!(matches!(result, Err(AccountError::AccountNotFound)));
    }
}
