//! User entity model: the directory consumed by the journey engine.

use crewpath_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub account_id: Option<DbId>,
    pub role_id: Option<DbId>,
    pub job_title_id: Option<DbId>,
    pub department: Option<String>,
    pub employment_status: String,
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub must_change_password: bool,
    pub password_changed_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Display name: "First Last", falling back to the username.
    pub fn display_name(&self) -> String {
        if !self.first_name.is_empty() && !self.last_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name)
        } else {
            self.username.clone()
        }
    }
}

/// DTO for creating a user.
///
/// When `role_id` is unset the system default role is assigned.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub account_id: Option<DbId>,
    pub role_id: Option<DbId>,
    pub job_title_id: Option<DbId>,
    pub department: Option<String>,
    pub created_by: Option<DbId>,
}
