//! Journey instance entity model.

use crewpath_core::journey::{self, JourneyStatus};
use crewpath_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A journey instance row from the `journey_instances` table.
///
/// `total_steps` and `completed_steps` are snapshot counters maintained
/// by the engine; they are not recomputed on read.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JourneyInstance {
    pub id: DbId,
    pub template_id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub expected_completion_date: Option<NaiveDate>,
    pub actual_completion_date: Option<NaiveDate>,
    pub total_steps: i32,
    pub completed_steps: i32,
    pub notes: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JourneyInstance {
    /// Parse the stored status string.
    pub fn parsed_status(&self) -> Result<JourneyStatus, String> {
        JourneyStatus::from_str_value(&self.status)
    }

    /// Completion percentage rounded to one decimal (0.0 for empty journeys).
    pub fn progress_percentage(&self) -> f64 {
        journey::progress_percentage(self.completed_steps, self.total_steps)
    }

    /// Whether the journey is overdue as of `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        let status = self
            .parsed_status()
            .unwrap_or(JourneyStatus::NotStarted);
        journey::is_overdue(today, self.expected_completion_date, status)
    }
}

/// DTO for creating a journey instance.
#[derive(Debug, Deserialize)]
pub struct CreateJourneyInstance {
    pub template_id: DbId,
    pub user_id: DbId,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
}
