//! Account directory.
//!
//! Business rules for reading, saving and deactivating accounts. Every
//! caller-facing operation resolves the caller first, then applies the
//! authorization guard, then touches storage.

use crate::auth::{authorize, require_admin, Credential};
use crate::errors::{AccountError, FieldError};
use crate::models::{Account, AccountRequest, RoleScope};
use crate::repositories::AccountsRepository;
use crate::services::auth_client::AuthClientTrait;
use crate::services::identity::IdentityResolver;
use sqlx::PgPool;
use tracing::instrument;

/// Service for account operations.
pub struct AccountDirectory;

impl AccountDirectory {
    /// Fetch an account the caller may see.
    #[instrument(skip_all, name = "acct.services.accounts.get_by_id", fields(account_number = account_number))]
    pub async fn get_by_id(
        pool: &PgPool,
        auth_client: &dyn AuthClientTrait,
        account_number: i32,
        credential: &Credential,
    ) -> Result<Account, AccountError> {
        let caller = IdentityResolver::resolve_caller(pool, auth_client, credential).await?;
        authorize(&caller, account_number)?;

        AccountsRepository::get_by_id(pool, account_number)
            .await?
            .ok_or(AccountError::AccountNotFound)
    }

    /// List accounts of one role. Admin only.
    ///
    /// An empty result is reported as `AccountNotFound`.
    #[instrument(skip_all, name = "acct.services.accounts.list", fields(scope = scope.as_str()))]
    pub async fn list(
        pool: &PgPool,
        auth_client: &dyn AuthClientTrait,
        scope: RoleScope,
        name_filter: Option<&str>,
        credential: &Credential,
    ) -> Result<Vec<Account>, AccountError> {
        let caller = IdentityResolver::resolve_caller(pool, auth_client, credential).await?;
        require_admin(&caller)?;

        let accounts = AccountsRepository::list_by_role(pool, scope.role_id(), name_filter).await?;
        if accounts.is_empty() {
            tracing::debug!(target: "acct.services.accounts", scope = scope.as_str(), "No accounts matched listing");
            return Err(AccountError::AccountNotFound);
        }
        Ok(accounts)
    }

    /// Validate and upsert an account as `account_number`.
    ///
    /// Checks run in order and nothing is written if any fails:
    /// 1. `username` and `email` present and non-blank (422)
    /// 2. neither longer than 45 characters (413)
    /// 3. a supplied role id exists (422)
    /// 4. no other account has the username, ignoring case (409)
    #[instrument(skip_all, name = "acct.services.accounts.save", fields(account_number = account_number))]
    pub async fn save(
        pool: &PgPool,
        account_number: i32,
        request: AccountRequest,
    ) -> Result<Account, AccountError> {
        let changes = request.into_changes(account_number)?;

        if let Some(role_id) = changes.role_id {
            if !AccountsRepository::role_exists(pool, role_id).await? {
                return Err(AccountError::Validation(vec![FieldError::new(
                    "role.roleId",
                    "unknown role",
                )]));
            }
        }

        if AccountsRepository::username_taken_by_other(pool, &changes.username, account_number)
            .await?
        {
            tracing::debug!(target: "acct.services.accounts", account_number = account_number, "Username already in use");
            return Err(AccountError::DuplicateUsername);
        }

        let saved = AccountsRepository::upsert(pool, &changes).await?;
        tracing::info!(target: "acct.services.accounts", account_number = saved.account_number, "Account saved");
        Ok(saved)
    }

    /// Update an account on behalf of the caller.
    ///
    /// Non-admin callers may edit only their own account and may not change
    /// its role. Deactivated accounts cannot be updated.
    #[instrument(skip_all, name = "acct.services.accounts.update", fields(account_number = account_number))]
    pub async fn update(
        pool: &PgPool,
        auth_client: &dyn AuthClientTrait,
        account_number: i32,
        request: AccountRequest,
        credential: &Credential,
    ) -> Result<Account, AccountError> {
        let caller = IdentityResolver::resolve_caller(pool, auth_client, credential).await?;
        authorize(&caller, account_number)?;

        if !caller.is_admin() {
            let requested_role = request.role.as_ref().map(|role| role.role_id);
            if requested_role.is_some_and(|role_id| role_id != caller.role.role_id) {
                tracing::debug!(
                    target: "acct.services.accounts",
                    caller = caller.account_number,
                    "Non-admin caller attempted a role change"
                );
                return Err(AccountError::AuthorizationDenied);
            }
        }

        // Deactivation is one-way.
        if AccountsRepository::get_by_id(pool, account_number)
            .await?
            .is_some_and(|existing| existing.is_deactivated())
        {
            tracing::debug!(target: "acct.services.accounts", account_number = account_number, "Refusing to update a deactivated account");
            return Err(AccountError::AccountNotFound);
        }

        Self::save(pool, account_number, request).await
    }

    /// Deactivate an account: keep the row and its travelers, clear the
    /// login fields.
    #[instrument(skip_all, name = "acct.services.accounts.deactivate", fields(account_number = account_number))]
    pub async fn deactivate(
        pool: &PgPool,
        auth_client: &dyn AuthClientTrait,
        account_number: i32,
        credential: &Credential,
    ) -> Result<(), AccountError> {
        let caller = IdentityResolver::resolve_caller(pool, auth_client, credential).await?;
        authorize(&caller, account_number)?;

        if AccountsRepository::get_by_id(pool, account_number)
            .await?
            .is_none()
        {
            return Err(AccountError::AccountNotFound);
        }

        AccountsRepository::deactivate(pool, account_number).await?;
        tracing::info!(target: "acct.services.accounts", account_number = account_number, "Account deactivated");
        Ok(())
    }
}
