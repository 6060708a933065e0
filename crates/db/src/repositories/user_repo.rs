//! Repository for the user directory.

use crewpath_core::error::CoreError;
use crewpath_core::types::DbId;
use sqlx::PgPool;

use crate::error::{unique_constraint, DbResult};
use crate::models::user::{CreateUser, User};
use crate::repositories::RoleRepo;

/// Column list shared across user queries.
const COLUMNS: &str = "id, username, email, first_name, last_name, account_id, role_id, \
    job_title_id, department, employment_status, termination_date, is_active, \
    must_change_password, password_changed_at, created_by, created_at, updated_at";

/// Provides directory operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a user.
    ///
    /// Falls back to the system default role when no role is given. New
    /// users must change their password on first login.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> DbResult<User> {
        let role_id = match input.role_id {
            Some(role_id) => Some(role_id),
            None => RoleRepo::default_role(pool).await?.map(|r| r.id),
        };

        let query = format!(
            "INSERT INTO users
                (username, email, first_name, last_name, account_id, role_id,
                 job_title_id, department, created_by)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.account_id)
            .bind(role_id)
            .bind(input.job_title_id)
            .bind(&input.department)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
            .map_err(|err| match unique_constraint(&err).as_deref() {
                Some("uq_users_username") => CoreError::validation(
                    "duplicate-username",
                    format!("Username '{}' is already taken", input.username),
                )
                .into(),
                Some("uq_users_email") => CoreError::validation(
                    "duplicate-email",
                    format!("Email '{}' is already in use", input.email),
                )
                .into(),
                _ => crate::DbError::Sqlx(err),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "Created user");
        Ok(user)
    }

    /// Record a password change, clearing the forced-change flag.
    pub async fn mark_password_changed(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users
             SET must_change_password = FALSE, password_changed_at = NOW()
             WHERE id = $1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a user by their internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by their unique username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List an account's active users by name.
    pub async fn list_by_account(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE account_id = $1 AND is_active
             ORDER BY last_name, first_name, username"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(account_id)
            .fetch_all(pool)
            .await
    }
}
