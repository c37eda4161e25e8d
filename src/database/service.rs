use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Account;

const ACCOUNT_COLUMNS: &str = "id, username, password_hash, is_active, created_at";

/// Look up an account by login name
pub async fn find_account_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<Account>, DatabaseError> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {} FROM accounts WHERE username = $1",
        ACCOUNT_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

pub async fn list_accounts(pool: &PgPool) -> Result<Vec<Account>, DatabaseError> {
    let accounts = sqlx::query_as::<_, Account>(&format!(
        "SELECT {} FROM accounts ORDER BY username",
        ACCOUNT_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(accounts)
}

/// Insert an account; `password_hash` must already be a PHC string
pub async fn create_account(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    is_active: bool,
) -> Result<Account, DatabaseError> {
    sqlx::query_as::<_, Account>(&format!(
        "INSERT INTO accounts (username, password_hash, is_active) VALUES ($1, $2, $3) RETURNING {}",
        ACCOUNT_COLUMNS
    ))
    .bind(username)
    .bind(password_hash)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            DatabaseError::Conflict(format!("account '{}' already exists", username))
        }
        other => DatabaseError::Sqlx(other),
    })
}

pub async fn set_account_password(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<(), DatabaseError> {
    let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE username = $1")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await?;
    ensure_account_touched(result.rows_affected(), username)
}

pub async fn set_account_active(
    pool: &PgPool,
    username: &str,
    is_active: bool,
) -> Result<(), DatabaseError> {
    let result = sqlx::query("UPDATE accounts SET is_active = $2 WHERE username = $1")
        .bind(username)
        .bind(is_active)
        .execute(pool)
        .await?;
    ensure_account_touched(result.rows_affected(), username)
}

fn ensure_account_touched(rows: u64, username: &str) -> Result<(), DatabaseError> {
    if rows == 0 {
        return Err(DatabaseError::NotFound(format!("account '{}' not found", username)));
    }
    Ok(())
}
