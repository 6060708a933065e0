//! Journey step instance entity model.

use crewpath_core::step::{self, StepStatus};
use crewpath_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// A per-journey step tracking row from `journey_step_instances`.
///
/// Created atomically when the parent journey starts, one per blueprint
/// step.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JourneyStepInstance {
    pub id: DbId,
    pub journey_id: DbId,
    pub step_template_id: DbId,
    pub assigned_to: Option<DbId>,
    pub status: String,
    pub due_date: NaiveDate,
    pub started_date: Option<Timestamp>,
    pub completed_date: Option<Timestamp>,
    pub completion_notes: String,
    pub completed_by: Option<DbId>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JourneyStepInstance {
    /// Parse the stored status string.
    pub fn parsed_status(&self) -> Result<StepStatus, String> {
        StepStatus::from_str_value(&self.status)
    }

    /// Whether the step is overdue as of `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        let status = self.parsed_status().unwrap_or(StepStatus::Pending);
        step::is_overdue(today, self.due_date, status)
    }
}
