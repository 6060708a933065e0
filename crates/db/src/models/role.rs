//! Role entity model.

use crewpath_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A role row from the `roles` table.
///
/// `level` is the hierarchy level (1 = Super Admin ... 5 = Read Only);
/// at most one role system-wide has `is_default = true`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub level: i32,
    pub is_system_role: bool,
    pub is_active: bool,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a role.
#[derive(Debug, Deserialize)]
pub struct CreateRole {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    /// Defaults to 4 (Staff) when unspecified.
    pub level: Option<i32>,
    pub is_default: Option<bool>,
}
