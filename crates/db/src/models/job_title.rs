//! Job title entity model.

use crewpath_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A job title row from the `job_titles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobTitle {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub department: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a job title.
#[derive(Debug, Deserialize)]
pub struct CreateJobTitle {
    pub title: String,
    pub description: Option<String>,
    pub department: Option<String>,
}
