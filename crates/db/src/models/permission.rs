//! Permission catalog and role<->permission through-relation models.

use crewpath_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A permission row from the `permissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Permission {
    pub id: DbId,
    pub name: String,
    pub codename: String,
    pub description: String,
    pub category: String,
    pub level: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a permission.
///
/// `codename` is derived from `name` (lowercased, spaces to underscores)
/// when not supplied.
#[derive(Debug, Deserialize)]
pub struct CreatePermission {
    pub name: String,
    pub codename: Option<String>,
    pub description: Option<String>,
    pub category: String,
    /// Defaults to `view` when unspecified.
    pub level: Option<String>,
}

/// A role<->permission row carrying the explicit allow/deny flag and
/// free-form constraints (stored, never interpreted).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RolePermission {
    pub id: DbId,
    pub role_id: DbId,
    pub permission_id: DbId,
    pub is_granted: bool,
    pub constraints: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for assigning or updating a role permission.
#[derive(Debug, Deserialize)]
pub struct AssignRolePermission {
    pub permission_id: DbId,
    /// Defaults to `true` (granted) when unspecified.
    pub is_granted: Option<bool>,
    pub constraints: Option<serde_json::Value>,
}
