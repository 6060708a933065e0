//! Repository for roles.
//!
//! Enforces the system-wide single-default invariant: at most one role
//! may be the default assigned to new users.

use crewpath_core::error::{CoreError, CONSTRAINT_UNIQUE_DEFAULT_ROLE};
use crewpath_core::permission::{self, ROLE_LEVEL_STAFF};
use crewpath_core::types::DbId;
use sqlx::PgPool;

use crate::error::{unique_constraint, DbResult};
use crate::models::role::{CreateRole, Role};

/// Column list shared across role queries.
const COLUMNS: &str = "id, name, display_name, description, level, is_system_role, \
    is_active, is_default, created_at, updated_at";

/// Provides role management operations.
pub struct RoleRepo;

impl RoleRepo {
    /// Create a role.
    ///
    /// Validates the hierarchy level (defaulting to Staff) and rejects a
    /// second default role before inserting; the partial unique index
    /// catches race losers.
    pub async fn create(pool: &PgPool, input: &CreateRole) -> DbResult<Role> {
        let level = input.level.unwrap_or(ROLE_LEVEL_STAFF);
        permission::validate_role_level(level)
            .map_err(|msg| CoreError::validation("invalid-role-level", msg))?;

        let mut tx = pool.begin().await?;

        if input.is_default.unwrap_or(false) {
            let default_exists: (bool,) =
                sqlx::query_as("SELECT EXISTS (SELECT 1 FROM roles WHERE is_default)")
                    .fetch_one(&mut *tx)
                    .await?;
            if default_exists.0 {
                return Err(CoreError::conflict(
                    CONSTRAINT_UNIQUE_DEFAULT_ROLE,
                    "A default role already exists",
                )
                .into());
            }
        }

        let query = format!(
            "INSERT INTO roles (name, display_name, description, level, is_default)
             VALUES ($1, $2, COALESCE($3, ''), $4, COALESCE($5, FALSE))
             RETURNING {COLUMNS}"
        );
        let role = sqlx::query_as::<_, Role>(&query)
            .bind(&input.name)
            .bind(&input.display_name)
            .bind(&input.description)
            .bind(level)
            .bind(input.is_default)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| match unique_constraint(&err).as_deref() {
                Some("uq_roles_name") => CoreError::validation(
                    "duplicate-role",
                    format!("A role named '{}' already exists", input.name),
                )
                .into(),
                Some("uq_roles_single_default") => CoreError::conflict(
                    CONSTRAINT_UNIQUE_DEFAULT_ROLE,
                    "A default role already exists",
                )
                .into(),
                _ => crate::DbError::Sqlx(err),
            })?;

        tx.commit().await?;

        tracing::info!(role_id = role.id, name = %role.name, "Created role");
        Ok(role)
    }

    /// Make `role_id` the single default role, clearing any previous one.
    pub async fn set_default(pool: &PgPool, role_id: DbId) -> DbResult<Role> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE roles SET is_default = FALSE WHERE is_default AND id <> $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE roles SET is_default = TRUE WHERE id = $1 RETURNING {COLUMNS}"
        );
        let role = sqlx::query_as::<_, Role>(&query)
            .bind(role_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "role",
                id: role_id,
            })?;

        tx.commit().await?;

        tracing::info!(role_id, "Changed default role");
        Ok(role)
    }

    /// The current default role, if one is configured.
    pub async fn default_role(pool: &PgPool) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE is_default AND is_active");
        sqlx::query_as::<_, Role>(&query).fetch_optional(pool).await
    }

    /// Find a role by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a role by its unique name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List active roles, highest authority first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE is_active ORDER BY level, name");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }
}
