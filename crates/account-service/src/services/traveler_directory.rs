//! Traveler directory.
//!
//! Every operation is gated on the caller owning the path account (or
//! being an admin).

use crate::auth::{authorize, Credential};
use crate::errors::AccountError;
use crate::models::{Traveler, TravelerRequest};
use crate::repositories::{AccountsRepository, TravelersRepository};
use crate::services::auth_client::AuthClientTrait;
use crate::services::identity::IdentityResolver;
use sqlx::PgPool;
use tracing::instrument;

/// Service for traveler operations.
pub struct TravelerDirectory;

impl TravelerDirectory {
    /// List every traveler of an account. An empty list is not an error.
    #[instrument(skip_all, name = "acct.services.travelers.list_for_account", fields(account_number = account_number))]
    pub async fn list_for_account(
        pool: &PgPool,
        auth_client: &dyn AuthClientTrait,
        account_number: i32,
        credential: &Credential,
    ) -> Result<Vec<Traveler>, AccountError> {
        let caller = IdentityResolver::resolve_caller(pool, auth_client, credential).await?;
        authorize(&caller, account_number)?;

        TravelersRepository::list_for_account(pool, account_number).await
    }

    /// Create a traveler (`traveler_id` is `None`) or update an existing one.
    ///
    /// An update only matches a traveler already attached to
    /// `account_number`; anything else is `TravelerNotFound`.
    #[instrument(skip_all, name = "acct.services.travelers.save", fields(account_number = account_number, traveler_id = ?traveler_id))]
    pub async fn save(
        pool: &PgPool,
        auth_client: &dyn AuthClientTrait,
        account_number: i32,
        traveler_id: Option<i32>,
        traveler: TravelerRequest,
        credential: &Credential,
    ) -> Result<Traveler, AccountError> {
        let caller = IdentityResolver::resolve_caller(pool, auth_client, credential).await?;
        authorize(&caller, account_number)?;
        traveler.validate()?;

        if AccountsRepository::get_by_id(pool, account_number)
            .await?
            .is_none()
        {
            return Err(AccountError::AccountNotFound);
        }

        let saved = match traveler_id {
            None => TravelersRepository::insert(pool, account_number, &traveler).await?,
            Some(traveler_id) => {
                TravelersRepository::update_for_account(pool, account_number, traveler_id, &traveler)
                    .await?
                    .ok_or(AccountError::TravelerNotFound)?
            }
        };

        tracing::info!(
            target: "acct.services.travelers",
            account_number = account_number,
            traveler_id = saved.traveler_id,
            "Traveler saved"
        );
        Ok(saved)
    }

    /// Hard-delete a traveler of an account.
    #[instrument(skip_all, name = "acct.services.travelers.delete", fields(account_number = account_number, traveler_id = traveler_id))]
    pub async fn delete(
        pool: &PgPool,
        auth_client: &dyn AuthClientTrait,
        account_number: i32,
        traveler_id: i32,
        credential: &Credential,
    ) -> Result<(), AccountError> {
        let caller = IdentityResolver::resolve_caller(pool, auth_client, credential).await?;
        authorize(&caller, account_number)?;

        let deleted =
            TravelersRepository::delete_for_account(pool, account_number, traveler_id).await?;
        if deleted == 0 {
            return Err(AccountError::TravelerNotFound);
        }

        tracing::info!(
            target: "acct.services.travelers",
            account_number = account_number,
            traveler_id = traveler_id,
            "Traveler deleted"
        );
        Ok(())
    }
}
