//! Direct database fixtures.

use sqlx::PgPool;

/// Role id of a standard user in the seeded `account_role` table.
pub const USER_ROLE: i32 = 1;

/// Role id of an administrator in the seeded `account_role` table.
pub const ADMIN_ROLE: i32 = 2;

/// Insert an active account with a fixed number.
///
/// Email is `<username>@example.com`, password is `password`.
pub async fn seed_account(
    pool: &PgPool,
    account_number: i32,
    username: &str,
    role_id: i32,
) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"
        INSERT INTO account (account_number, username, email, password, date_created, role_id)
        VALUES ($1, $2, $3, 'password', DATE '2021-01-01', $4)
        "#,
    )
    .bind(account_number)
    .bind(username)
    .bind(format!("{username}@example.com"))
    .bind(role_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert a traveler under `account_number` and return its id.
pub async fn seed_traveler(
    pool: &PgPool,
    account_number: i32,
    given_name: &str,
) -> Result<i32, anyhow::Error> {
    let (traveler_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO traveler (account_number, given_name, family_name)
        VALUES ($1, $2, 'Fixture')
        RETURNING traveler_id
        "#,
    )
    .bind(account_number)
    .bind(given_name)
    .fetch_one(pool)
    .await?;
    Ok(traveler_id)
}
