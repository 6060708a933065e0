//! Repository for the permission catalog, role grants, and direct user
//! grants.
//!
//! Effective-permission resolution loads the role's grant rows and the
//! user's direct grants, then delegates the set arithmetic to
//! `crewpath_core::permission`.

use std::collections::BTreeSet;

use crewpath_core::error::{CoreError, CONSTRAINT_DUPLICATE_ROLE_PERMISSION};
use crewpath_core::permission::{self, RoleGrant};
use crewpath_core::types::DbId;
use sqlx::PgPool;

use crate::error::{unique_constraint, DbResult};
use crate::models::permission::{
    AssignRolePermission, CreatePermission, Permission, RolePermission,
};

/// Column list shared across permission queries.
const COLUMNS: &str =
    "id, name, codename, description, category, level, is_active, created_at, updated_at";

const ROLE_PERMISSION_COLUMNS: &str =
    "id, role_id, permission_id, is_granted, constraints, created_at, updated_at";

/// Provides permission catalog and grant resolution operations.
pub struct PermissionRepo;

impl PermissionRepo {
    /// Create a permission.
    ///
    /// Validates category and level against the fixed taxonomies and
    /// derives the codename from the name when unspecified.
    pub async fn create(pool: &PgPool, input: &CreatePermission) -> DbResult<Permission> {
        permission::validate_category(&input.category)
            .map_err(|msg| CoreError::validation("invalid-category", msg))?;
        let level = input
            .level
            .clone()
            .unwrap_or_else(|| permission::LEVEL_VIEW.to_string());
        permission::validate_level(&level)
            .map_err(|msg| CoreError::validation("invalid-level", msg))?;
        let codename = input
            .codename
            .clone()
            .unwrap_or_else(|| permission::derive_codename(&input.name));

        let query = format!(
            "INSERT INTO permissions (name, codename, description, category, level)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Permission>(&query)
            .bind(&input.name)
            .bind(&codename)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&level)
            .fetch_one(pool)
            .await
            .map_err(|err| match unique_constraint(&err).as_deref() {
                Some("uq_permissions_name") | Some("uq_permissions_codename") => {
                    CoreError::validation(
                        "duplicate-permission",
                        format!("A permission named '{}' already exists", input.name),
                    )
                    .into()
                }
                _ => crate::DbError::Sqlx(err),
            })?;

        tracing::info!(permission_id = created.id, codename = %created.codename, "Created permission");
        Ok(created)
    }

    /// Grant or deny a permission to a role.
    ///
    /// Upserts on (role, permission): re-assigning an existing pair
    /// updates the grant flag and constraints in place.
    pub async fn assign_to_role(
        pool: &PgPool,
        role_id: DbId,
        input: &AssignRolePermission,
    ) -> DbResult<RolePermission> {
        let query = format!(
            "INSERT INTO role_permissions (role_id, permission_id, is_granted, constraints)
             VALUES ($1, $2, COALESCE($3, TRUE), COALESCE($4, '{{}}'::jsonb))
             ON CONFLICT ON CONSTRAINT uq_role_permissions_role_permission
             DO UPDATE SET is_granted = EXCLUDED.is_granted,
                           constraints = EXCLUDED.constraints
             RETURNING {ROLE_PERMISSION_COLUMNS}"
        );
        let assigned = sqlx::query_as::<_, RolePermission>(&query)
            .bind(role_id)
            .bind(input.permission_id)
            .bind(input.is_granted)
            .bind(&input.constraints)
            .fetch_one(pool)
            .await?;

        tracing::info!(
            role_id,
            permission_id = input.permission_id,
            is_granted = assigned.is_granted,
            "Assigned role permission"
        );
        Ok(assigned)
    }

    /// Insert a role grant strictly; an existing pair is an error.
    ///
    /// Used where the caller must know the pair already existed instead
    /// of silently updating it.
    pub async fn add_to_role(
        pool: &PgPool,
        role_id: DbId,
        input: &AssignRolePermission,
    ) -> DbResult<RolePermission> {
        let query = format!(
            "INSERT INTO role_permissions (role_id, permission_id, is_granted, constraints)
             VALUES ($1, $2, COALESCE($3, TRUE), COALESCE($4, '{{}}'::jsonb))
             RETURNING {ROLE_PERMISSION_COLUMNS}"
        );
        sqlx::query_as::<_, RolePermission>(&query)
            .bind(role_id)
            .bind(input.permission_id)
            .bind(input.is_granted)
            .bind(&input.constraints)
            .fetch_one(pool)
            .await
            .map_err(|err| match unique_constraint(&err).as_deref() {
                Some("uq_role_permissions_role_permission") => CoreError::validation(
                    CONSTRAINT_DUPLICATE_ROLE_PERMISSION,
                    "This role already has an assignment for this permission",
                )
                .into(),
                _ => crate::DbError::Sqlx(err),
            })
    }

    /// Remove a permission assignment from a role.
    pub async fn remove_from_role(
        pool: &PgPool,
        role_id: DbId,
        permission_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = $2",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Grant a permission directly to a user. Idempotent.
    pub async fn grant_direct(
        pool: &PgPool,
        user_id: DbId,
        permission_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_permissions (user_id, permission_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_user_permissions_user_permission DO NOTHING",
        )
        .bind(user_id)
        .bind(permission_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Revoke a direct user grant.
    pub async fn revoke_direct(
        pool: &PgPool,
        user_id: DbId,
        permission_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_permissions WHERE user_id = $1 AND permission_id = $2",
        )
        .bind(user_id)
        .bind(permission_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// A role's grant rows (codename plus allow/deny flag), active
    /// permissions only.
    pub async fn role_grants(pool: &PgPool, role_id: DbId) -> Result<Vec<RoleGrant>, sqlx::Error> {
        let rows: Vec<(String, bool)> = sqlx::query_as(
            "SELECT p.codename, rp.is_granted
             FROM role_permissions rp
             JOIN permissions p ON p.id = rp.permission_id
             WHERE rp.role_id = $1 AND p.is_active",
        )
        .bind(role_id)
        .fetch_all(pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(codename, is_granted)| RoleGrant {
                codename,
                is_granted,
            })
            .collect())
    }

    /// True iff the role has an explicit grant for `codename`.
    pub async fn role_has(
        pool: &PgPool,
        role_id: DbId,
        codename: &str,
    ) -> Result<bool, sqlx::Error> {
        let (has,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM role_permissions rp
                JOIN permissions p ON p.id = rp.permission_id
                WHERE rp.role_id = $1 AND p.codename = $2 AND rp.is_granted AND p.is_active
             )",
        )
        .bind(role_id)
        .bind(codename)
        .fetch_one(pool)
        .await?;
        Ok(has)
    }

    /// Resolve a user's effective permission codenames.
    ///
    /// Role-level grants (minus denies) unioned with direct grants; a
    /// role-level deny does not revoke a direct grant. A user without a
    /// role still gets their direct grants.
    pub async fn effective_permissions(
        pool: &PgPool,
        user_id: DbId,
    ) -> DbResult<BTreeSet<String>> {
        let role_id: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT role_id FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        let role_id = role_id
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?
            .0;

        let role_grants = match role_id {
            Some(role_id) => Self::role_grants(pool, role_id).await?,
            None => Vec::new(),
        };

        let direct: Vec<(String,)> = sqlx::query_as(
            "SELECT p.codename
             FROM user_permissions up
             JOIN permissions p ON p.id = up.permission_id
             WHERE up.user_id = $1 AND p.is_active",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(permission::effective_permissions(
            &role_grants,
            direct.into_iter().map(|(codename,)| codename),
        ))
    }

    /// A role's granted permissions grouped by category for display.
    pub async fn role_permissions_by_category(
        pool: &PgPool,
        role_id: DbId,
    ) -> Result<std::collections::BTreeMap<String, Vec<Permission>>, sqlx::Error> {
        let query = format!(
            "SELECT p.{} FROM role_permissions rp
             JOIN permissions p ON p.id = rp.permission_id
             WHERE rp.role_id = $1 AND rp.is_granted AND p.is_active
             ORDER BY p.category, p.name",
            COLUMNS.replace(", ", ", p.")
        );
        let rows = sqlx::query_as::<_, Permission>(&query)
            .bind(role_id)
            .fetch_all(pool)
            .await?;
        Ok(permission::group_by_category(
            rows.into_iter().map(|p| (p.category.clone(), p)).collect(),
        ))
    }

    /// Find a permission by its codename.
    pub async fn find_by_codename(
        pool: &PgPool,
        codename: &str,
    ) -> Result<Option<Permission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM permissions WHERE codename = $1");
        sqlx::query_as::<_, Permission>(&query)
            .bind(codename)
            .fetch_optional(pool)
            .await
    }

    /// List the active permission catalog, ordered by category then name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Permission>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM permissions WHERE is_active ORDER BY category, name");
        sqlx::query_as::<_, Permission>(&query).fetch_all(pool).await
    }
}
