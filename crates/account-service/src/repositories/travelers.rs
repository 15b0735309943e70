//! Travelers repository for database operations.

use super::observe;
use crate::errors::AccountError;
use crate::models::{Traveler, TravelerRequest};
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;

/// Repository for traveler operations.
pub struct TravelersRepository;

impl TravelersRepository {
    /// List all travelers of an account, ordered by traveler id.
    #[instrument(skip_all, name = "acct.repo.travelers.list_for_account", fields(account_number = account_number))]
    pub async fn list_for_account(
        pool: &PgPool,
        account_number: i32,
    ) -> Result<Vec<Traveler>, AccountError> {
        let start = Instant::now();
        let result: Result<Vec<Traveler>, sqlx::Error> = sqlx::query_as(
            r#"
            SELECT traveler_id, account_number, given_name, family_name,
                   dob, gender, phone, email, address
            FROM traveler
            WHERE account_number = $1
            ORDER BY traveler_id
            "#,
        )
        .bind(account_number)
        .fetch_all(pool)
        .await;
        observe("list_travelers", start, &result);

        Ok(result?)
    }

    /// Insert a new traveler under `account_number`.
    #[instrument(skip_all, name = "acct.repo.travelers.insert", fields(account_number = account_number))]
    pub async fn insert(
        pool: &PgPool,
        account_number: i32,
        traveler: &TravelerRequest,
    ) -> Result<Traveler, AccountError> {
        let start = Instant::now();
        let result: Result<Traveler, sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO traveler (account_number, given_name, family_name, dob, gender, phone, email, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING traveler_id, account_number, given_name, family_name,
                      dob, gender, phone, email, address
            "#,
        )
        .bind(account_number)
        .bind(&traveler.given_name)
        .bind(&traveler.family_name)
        .bind(traveler.dob)
        .bind(&traveler.gender)
        .bind(&traveler.phone)
        .bind(&traveler.email)
        .bind(&traveler.address)
        .fetch_one(pool)
        .await;
        observe("insert_traveler", start, &result);

        Ok(result?)
    }

    /// Replace the profile of a traveler that belongs to `account_number`.
    ///
    /// Returns `None` if no such traveler exists under that account; the
    /// owning account is never changed.
    #[instrument(skip_all, name = "acct.repo.travelers.update_for_account", fields(account_number = account_number, traveler_id = traveler_id))]
    pub async fn update_for_account(
        pool: &PgPool,
        account_number: i32,
        traveler_id: i32,
        traveler: &TravelerRequest,
    ) -> Result<Option<Traveler>, AccountError> {
        let start = Instant::now();
        let result: Result<Option<Traveler>, sqlx::Error> = sqlx::query_as(
            r#"
            UPDATE traveler
            SET given_name = $3, family_name = $4, dob = $5, gender = $6,
                phone = $7, email = $8, address = $9
            WHERE traveler_id = $1 AND account_number = $2
            RETURNING traveler_id, account_number, given_name, family_name,
                      dob, gender, phone, email, address
            "#,
        )
        .bind(traveler_id)
        .bind(account_number)
        .bind(&traveler.given_name)
        .bind(&traveler.family_name)
        .bind(traveler.dob)
        .bind(&traveler.gender)
        .bind(&traveler.phone)
        .bind(&traveler.email)
        .bind(&traveler.address)
        .fetch_optional(pool)
        .await;
        observe("update_traveler", start, &result);

        Ok(result?)
    }

    /// Hard-delete a traveler of `account_number`.
    ///
    /// Returns the number of rows deleted.
    #[instrument(skip_all, name = "acct.repo.travelers.delete_for_account", fields(account_number = account_number, traveler_id = traveler_id))]
    pub async fn delete_for_account(
        pool: &PgPool,
        account_number: i32,
        traveler_id: i32,
    ) -> Result<u64, AccountError> {
        let start = Instant::now();
        let result = sqlx::query("DELETE FROM traveler WHERE traveler_id = $1 AND account_number = $2")
            .bind(traveler_id)
            .bind(account_number)
            .execute(pool)
            .await;
        observe("delete_traveler", start, &result);

        Ok(result?.rows_affected())
    }
}
