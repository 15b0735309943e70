//! Account service models.
//!
//! Wire types use camelCase field names. Passwords are accepted on input
//! but never serialized.

use crate::errors::{AccountError, FieldError};
use chrono::NaiveDate;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Role id of a standard user.
pub const USER_ROLE_ID: i32 = 1;

/// Role id of an administrator.
pub const ADMIN_ROLE_ID: i32 = 2;

/// Role tag of a standard user.
pub const USER_ROLE_TYPE: &str = "ROLE_USER";

/// Role tag granting the admin bypass.
pub const ADMIN_ROLE_TYPE: &str = "ROLE_ADMIN";

/// Column width of `username` and `email` (and most traveler fields).
pub const MAX_FIELD_LENGTH: usize = 45;

/// Column width of `traveler.address`.
pub const MAX_ADDRESS_LENGTH: usize = 255;

/// Role scope for the role-filtered account listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleScope {
    Users,
    Admins,
}

impl RoleScope {
    pub fn role_id(self) -> i32 {
        match self {
            RoleScope::Users => USER_ROLE_ID,
            RoleScope::Admins => ADMIN_ROLE_ID,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoleScope::Users => "users",
            RoleScope::Admins => "admins",
        }
    }
}

/// Account role reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRole {
    pub role_id: i32,
    pub role_type: String,
}

impl AccountRole {
    pub fn is_admin(&self) -> bool {
        self.role_type == ADMIN_ROLE_TYPE
    }
}

/// An account as returned to clients.
///
/// A deactivated account keeps its number, creation date and role but has
/// no username, email or password.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: i32,
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<SecretString>,
    pub date_created: NaiveDate,
    pub role: AccountRole,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_deactivated(&self) -> bool {
        self.username.is_none()
    }
}

/// Row shape of `account JOIN account_role`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub account_number: i32,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub date_created: NaiveDate,
    pub role_id: i32,
    pub role_type: String,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            account_number: row.account_number,
            username: row.username,
            email: row.email,
            password: row.password.map(SecretString::from),
            date_created: row.date_created,
            role: AccountRole {
                role_id: row.role_id,
                role_type: row.role_type,
            },
        }
    }
}

/// Role reference inside an account request body. Only the id is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRef {
    pub role_id: i32,
}

/// Request body for `PUT /accounts/{accountNumber}`.
///
/// `accountNumber` in the body is ignored; the path id wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub account_number: Option<i32>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub date_created: Option<NaiveDate>,
    pub role: Option<RoleRef>,
}

/// A validated account write, ready for the upsert.
#[derive(Debug, Clone)]
pub struct AccountChanges {
    pub account_number: i32,
    pub username: String,
    pub email: String,
    pub password: Option<SecretString>,
    pub date_created: Option<NaiveDate>,
    pub role_id: Option<i32>,
}

impl AccountRequest {
    /// Validate the request and bind it to `account_number`.
    ///
    /// A `username` or `email` longer than [`MAX_FIELD_LENGTH`] characters
    /// fails with `OversizedValue`, even when the other field is missing.
    /// Otherwise missing or blank values fail with `Validation`.
    pub fn into_changes(self, account_number: i32) -> Result<AccountChanges, AccountError> {
        let oversized = [&self.username, &self.email]
            .iter()
            .filter_map(|field| field.as_deref())
            .any(|value| exceeds(value, MAX_FIELD_LENGTH));
        if oversized {
            return Err(AccountError::OversizedValue);
        }

        let mut field_errors = Vec::new();

        let username = match self.username {
            Some(username) if !username.trim().is_empty() => Some(username),
            _ => {
                field_errors.push(FieldError::new("username", "must not be blank"));
                None
            }
        };
        let email = match self.email {
            Some(email) if !email.trim().is_empty() => Some(email),
            _ => {
                field_errors.push(FieldError::new("email", "must not be blank"));
                None
            }
        };

        let (Some(username), Some(email)) = (username, email) else {
            return Err(AccountError::Validation(field_errors));
        };

        Ok(AccountChanges {
            account_number,
            username,
            email,
            password: self.password,
            date_created: self.date_created,
            role_id: self.role.map(|role| role.role_id),
        })
    }
}

/// A traveler attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Traveler {
    pub traveler_id: i32,
    pub account_number: i32,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Request body for creating or updating a traveler.
///
/// `travelerId` and `accountNumber` in the body are ignored; the path wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerRequest {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl TravelerRequest {
    /// Reject profile values wider than their columns.
    pub fn validate(&self) -> Result<(), AccountError> {
        let narrow_fields = [
            &self.given_name,
            &self.family_name,
            &self.gender,
            &self.phone,
            &self.email,
        ];

        let too_long = narrow_fields
            .iter()
            .filter_map(|field| field.as_deref())
            .any(|value| exceeds(value, MAX_FIELD_LENGTH))
            || self
                .address
                .as_deref()
                .is_some_and(|address| exceeds(address, MAX_ADDRESS_LENGTH));

        if too_long {
            return Err(AccountError::OversizedValue);
        }
        Ok(())
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status ("healthy" or "unhealthy").
    pub status: String,

    /// Database connectivity status.
    pub database: String,
}

fn exceeds(value: &str, max: usize) -> bool {
    value.chars().count() > max
}
