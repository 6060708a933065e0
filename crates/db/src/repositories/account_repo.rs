//! Repository for company accounts (tenants).

use crewpath_core::types::DbId;
use sqlx::PgPool;

use crate::models::account::{Account, CreateAccount};

const COLUMNS: &str =
    "id, name, timezone, contact_email, is_active, max_users, created_at, updated_at";

/// Provides tenant account operations.
pub struct AccountRepo;

impl AccountRepo {
    /// Create an account. Timezone defaults to UTC, seat cap to 50.
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts (name, timezone, contact_email, max_users)
             VALUES ($1, COALESCE($2, 'UTC'), $3, COALESCE($4, 50))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.name)
            .bind(&input.timezone)
            .bind(&input.contact_email)
            .bind(input.max_users)
            .fetch_one(pool)
            .await
    }

    /// Find an account by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active accounts by name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE is_active ORDER BY name");
        sqlx::query_as::<_, Account>(&query).fetch_all(pool).await
    }

    /// Number of active users in an account, for seat-cap checks.
    pub async fn active_user_count(pool: &PgPool, account_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users WHERE account_id = $1 AND is_active",
        )
        .bind(account_id)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }
}
