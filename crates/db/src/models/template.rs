//! Journey template entity model.

use crewpath_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A journey template row from the `journey_templates` table.
///
/// Templates are shared, read-only configuration; instances reference
/// them but never own them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JourneyTemplate {
    pub id: DbId,
    pub account_id: DbId,
    pub journey_type: String,
    pub title: String,
    pub description: String,
    pub job_title_id: Option<DbId>,
    pub department: Option<String>,
    pub business_unit: Option<String>,
    pub estimated_duration_days: i32,
    pub is_active: bool,
    pub is_default: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a journey template.
#[derive(Debug, Deserialize)]
pub struct CreateJourneyTemplate {
    pub account_id: DbId,
    pub journey_type: String,
    pub title: String,
    pub description: Option<String>,
    pub job_title_id: Option<DbId>,
    pub department: Option<String>,
    pub business_unit: Option<String>,
    pub estimated_duration_days: i32,
    pub is_default: Option<bool>,
    pub created_by: Option<DbId>,
}
