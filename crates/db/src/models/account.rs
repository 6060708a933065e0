//! Company account (tenant) entity model.

use crewpath_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An account row from the `accounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    pub name: String,
    pub timezone: String,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub max_users: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccount {
    pub name: String,
    pub timezone: Option<String>,
    pub contact_email: Option<String>,
    pub max_users: Option<i32>,
}
