//! Accounts repository for database operations.
//!
//! # Security
//!
//! - All queries use parameterized statements
//! - Passwords are never logged

use super::observe;
use crate::errors::AccountError;
use crate::models::{Account, AccountChanges, AccountRow, USER_ROLE_ID};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Repository for account operations.
pub struct AccountsRepository;

impl AccountsRepository {
    /// Fetch an account with its role by account number.
    #[instrument(skip_all, name = "acct.repo.accounts.get_by_id", fields(account_number = account_number))]
    pub async fn get_by_id(pool: &PgPool, account_number: i32) -> Result<Option<Account>, AccountError> {
        let start = Instant::now();
        let result: Result<Option<AccountRow>, sqlx::Error> = sqlx::query_as(
            r#"
            SELECT a.account_number, a.username, a.email, a.password,
                   a.date_created, a.role_id, r.role_type
            FROM account a
            JOIN account_role r ON r.role_id = a.role_id
            WHERE a.account_number = $1
            "#,
        )
        .bind(account_number)
        .fetch_optional(pool)
        .await;
        observe("get_account_by_id", start, &result);

        Ok(result?.map(Account::from))
    }

    /// Fetch an account by exact username.
    ///
    /// Deactivated accounts have no username and are never returned.
    #[instrument(skip_all, name = "acct.repo.accounts.get_by_username")]
    pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<Account>, AccountError> {
        let start = Instant::now();
        let result: Result<Option<AccountRow>, sqlx::Error> = sqlx::query_as(
            r#"
            SELECT a.account_number, a.username, a.email, a.password,
                   a.date_created, a.role_id, r.role_type
            FROM account a
            JOIN account_role r ON r.role_id = a.role_id
            WHERE a.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await;
        observe("get_account_by_username", start, &result);

        Ok(result?.map(Account::from))
    }

    /// List accounts holding `role_id`, ordered by account number.
    ///
    /// With a filter, only accounts whose username contains it
    /// (case-sensitive) are returned.
    #[instrument(skip_all, name = "acct.repo.accounts.list_by_role", fields(role_id = role_id, filtered = filter.is_some()))]
    pub async fn list_by_role(
        pool: &PgPool,
        role_id: i32,
        filter: Option<&str>,
    ) -> Result<Vec<Account>, AccountError> {
        let start = Instant::now();
        let result: Result<Vec<AccountRow>, sqlx::Error> = sqlx::query_as(
            r#"
            SELECT a.account_number, a.username, a.email, a.password,
                   a.date_created, a.role_id, r.role_type
            FROM account a
            JOIN account_role r ON r.role_id = a.role_id
            WHERE a.role_id = $1
              AND ($2::TEXT IS NULL OR strpos(a.username, $2) > 0)
            ORDER BY a.account_number
            "#,
        )
        .bind(role_id)
        .bind(filter)
        .fetch_all(pool)
        .await;
        observe("list_accounts_by_role", start, &result);

        Ok(result?.into_iter().map(Account::from).collect())
    }

    /// True if an account other than `account_number` already uses
    /// `username`, compared case-insensitively.
    #[instrument(skip_all, name = "acct.repo.accounts.username_taken_by_other", fields(account_number = account_number))]
    pub async fn username_taken_by_other(
        pool: &PgPool,
        username: &str,
        account_number: i32,
    ) -> Result<bool, AccountError> {
        let start = Instant::now();
        let result: Result<(bool,), sqlx::Error> = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM account
                WHERE lower(username) = lower($1)
                  AND account_number <> $2
            )
            "#,
        )
        .bind(username)
        .bind(account_number)
        .fetch_one(pool)
        .await;
        observe("username_taken_by_other", start, &result);

        Ok(result?.0)
    }

    /// True if `role_id` names a seeded role.
    #[instrument(skip_all, name = "acct.repo.accounts.role_exists", fields(role_id = role_id))]
    pub async fn role_exists(pool: &PgPool, role_id: i32) -> Result<bool, AccountError> {
        let start = Instant::now();
        let result: Result<(bool,), sqlx::Error> =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM account_role WHERE role_id = $1)")
                .bind(role_id)
                .fetch_one(pool)
                .await;
        observe("role_exists", start, &result);

        Ok(result?.0)
    }

    /// Insert or update an account by account number.
    ///
    /// On update a missing password or role keeps the stored value and
    /// `date_created` is left untouched. On insert the role defaults to
    /// user and the creation date to today.
    ///
    /// # Errors
    ///
    /// - `AccountError::DuplicateUsername` if the write collides with the
    ///   case-insensitive username index
    /// - `AccountError::Database` for other failures
    #[instrument(skip_all, name = "acct.repo.accounts.upsert", fields(account_number = changes.account_number))]
    pub async fn upsert(pool: &PgPool, changes: &AccountChanges) -> Result<Account, AccountError> {
        let start = Instant::now();
        let result: Result<AccountRow, sqlx::Error> = sqlx::query_as(
            r#"
            WITH saved AS (
                INSERT INTO account (account_number, username, email, password, date_created, role_id)
                VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE), COALESCE($6, $7))
                ON CONFLICT (account_number) DO UPDATE
                SET username = EXCLUDED.username,
                    email = EXCLUDED.email,
                    password = COALESCE($4, account.password),
                    role_id = COALESCE($6, account.role_id)
                RETURNING account_number, username, email, password, date_created, role_id
            )
            SELECT s.account_number, s.username, s.email, s.password,
                   s.date_created, s.role_id, r.role_type
            FROM saved s
            JOIN account_role r ON r.role_id = s.role_id
            "#,
        )
        .bind(changes.account_number)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(changes.password.as_ref().map(|p| p.expose_secret().to_string()))
        .bind(changes.date_created)
        .bind(changes.role_id)
        .bind(USER_ROLE_ID)
        .fetch_one(pool)
        .await;
        observe("upsert_account", start, &result);

        result.map(Account::from).map_err(|e| {
            let unique_violation = matches!(
                &e,
                sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
            );
            if unique_violation {
                tracing::debug!(target: "acct.repo.accounts", "Username index rejected write");
                AccountError::DuplicateUsername
            } else {
                AccountError::from(e)
            }
        })
    }

    /// Null the login fields of an account, keeping the row.
    ///
    /// Returns the number of rows updated.
    #[instrument(skip_all, name = "acct.repo.accounts.deactivate", fields(account_number = account_number))]
    pub async fn deactivate(pool: &PgPool, account_number: i32) -> Result<u64, AccountError> {
        let start = Instant::now();
        let result = sqlx::query(
            r#"
            UPDATE account
            SET username = NULL, email = NULL, password = NULL
            WHERE account_number = $1
            "#,
        )
        .bind(account_number)
        .execute(pool)
        .await;
        observe("deactivate_account", start, &result);

        Ok(result?.rows_affected())
    }
}
