//! Journey step blueprint entity model.

use crewpath_core::step;
use crewpath_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A step blueprint row from the `journey_steps` table.
///
/// `is_mandatory` and `is_blocking` are declared metadata; the tracker
/// does not gate transitions on them. Ordering is advisory.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JourneyStep {
    pub id: DbId,
    pub template_id: DbId,
    pub title: String,
    pub description: String,
    pub step_type: String,
    pub responsible_party_id: Option<DbId>,
    pub responsible_role: Option<String>,
    pub due_days_from_start: i32,
    pub estimated_duration_hours: Option<i32>,
    pub step_order: i32,
    pub is_mandatory: bool,
    pub is_blocking: bool,
    pub requires_approval: bool,
    pub auto_assign: bool,
    pub notes: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JourneyStep {
    /// Display-friendly responsible party, given the resolved display
    /// name of `responsible_party_id` (if any). Falls back to the
    /// free-text role, then "Unassigned".
    pub fn responsible_display(&self, party_name: Option<&str>) -> String {
        step::responsible_display(party_name, self.responsible_role.as_deref())
    }
}

/// DTO for adding a step to a template.
///
/// `step_order` is auto-assigned (max + 1 within the template) when
/// unspecified.
#[derive(Debug, Deserialize)]
pub struct CreateJourneyStep {
    pub title: String,
    pub description: Option<String>,
    pub step_type: String,
    pub responsible_party_id: Option<DbId>,
    pub responsible_role: Option<String>,
    pub due_days_from_start: i32,
    pub estimated_duration_hours: Option<i32>,
    pub step_order: Option<i32>,
    pub is_mandatory: Option<bool>,
    pub is_blocking: Option<bool>,
    pub requires_approval: Option<bool>,
    pub auto_assign: Option<bool>,
    pub notes: Option<String>,
}
