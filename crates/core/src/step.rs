//! Step blueprint categories and the step-instance state machine.
//!
//! Blueprint steps carry a category (`StepType`), a responsible party or
//! role, and timing metadata. Step instances move through their own small
//! lifecycle:
//!
//! ```text
//! pending --start--> in_progress --complete--> completed
//! pending/in_progress --> skipped | blocked
//! ```
//!
//! `is_mandatory` and `is_blocking` are stored on blueprints but do not
//! gate transitions; a step can be completed while an earlier blocking
//! step is still pending. Ordering is advisory.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::types::Date;

// ---------------------------------------------------------------------------
// Step type
// ---------------------------------------------------------------------------

pub const STEP_TYPE_ORIENTATION: &str = "orientation";
pub const STEP_TYPE_DOCUMENTATION: &str = "documentation";
pub const STEP_TYPE_TRAINING: &str = "training";
pub const STEP_TYPE_SYSTEM_ACCESS: &str = "system_access";
pub const STEP_TYPE_EQUIPMENT: &str = "equipment";
pub const STEP_TYPE_MEETING: &str = "meeting";
pub const STEP_TYPE_REVIEW: &str = "review";
pub const STEP_TYPE_HANDOVER: &str = "handover";
pub const STEP_TYPE_EXIT_INTERVIEW: &str = "exit_interview";
pub const STEP_TYPE_ASSET_RETURN: &str = "asset_return";
pub const STEP_TYPE_ACCESS_REVOCATION: &str = "access_revocation";
pub const STEP_TYPE_FINAL_SETTLEMENT: &str = "final_settlement";
pub const STEP_TYPE_OTHER: &str = "other";

/// All valid step type strings.
pub const VALID_STEP_TYPES: &[&str] = &[
    STEP_TYPE_ORIENTATION,
    STEP_TYPE_DOCUMENTATION,
    STEP_TYPE_TRAINING,
    STEP_TYPE_SYSTEM_ACCESS,
    STEP_TYPE_EQUIPMENT,
    STEP_TYPE_MEETING,
    STEP_TYPE_REVIEW,
    STEP_TYPE_HANDOVER,
    STEP_TYPE_EXIT_INTERVIEW,
    STEP_TYPE_ASSET_RETURN,
    STEP_TYPE_ACCESS_REVOCATION,
    STEP_TYPE_FINAL_SETTLEMENT,
    STEP_TYPE_OTHER,
];

/// Validate that a step type string is one of the accepted categories.
pub fn validate_step_type(step_type: &str) -> Result<(), String> {
    if VALID_STEP_TYPES.contains(&step_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid step type '{step_type}'. Must be one of: {}",
            VALID_STEP_TYPES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Step instance status
// ---------------------------------------------------------------------------

pub const STEP_STATUS_PENDING: &str = "pending";
pub const STEP_STATUS_IN_PROGRESS: &str = "in_progress";
pub const STEP_STATUS_COMPLETED: &str = "completed";
pub const STEP_STATUS_SKIPPED: &str = "skipped";
pub const STEP_STATUS_BLOCKED: &str = "blocked";

/// All valid step instance status strings.
pub const VALID_STEP_STATUSES: &[&str] = &[
    STEP_STATUS_PENDING,
    STEP_STATUS_IN_PROGRESS,
    STEP_STATUS_COMPLETED,
    STEP_STATUS_SKIPPED,
    STEP_STATUS_BLOCKED,
];

/// Current state of a per-journey step instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
    Blocked,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STEP_STATUS_PENDING,
            Self::InProgress => STEP_STATUS_IN_PROGRESS,
            Self::Completed => STEP_STATUS_COMPLETED,
            Self::Skipped => STEP_STATUS_SKIPPED,
            Self::Blocked => STEP_STATUS_BLOCKED,
        }
    }

    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STEP_STATUS_PENDING => Ok(Self::Pending),
            STEP_STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STEP_STATUS_COMPLETED => Ok(Self::Completed),
            STEP_STATUS_SKIPPED => Ok(Self::Skipped),
            STEP_STATUS_BLOCKED => Ok(Self::Blocked),
            _ => Err(format!(
                "Invalid step status '{s}'. Must be one of: {}",
                VALID_STEP_STATUSES.join(", ")
            )),
        }
    }

    /// `mark_completed` is a no-op (soft failure) once already completed.
    pub fn can_complete(&self) -> bool {
        *self != Self::Completed
    }

    /// Only pending steps can be started.
    pub fn can_start(&self) -> bool {
        *self == Self::Pending
    }
}

// ---------------------------------------------------------------------------
// Validation + derived values
// ---------------------------------------------------------------------------

/// Validate a step's due offset against its template's estimated duration.
///
/// Enforced at write time: a step cannot be due after the journey is
/// expected to have finished.
pub fn validate_due_days(due_days_from_start: i32, estimated_duration_days: i32) -> Result<(), String> {
    if due_days_from_start > estimated_duration_days {
        return Err(format!(
            "Due date ({due_days_from_start} days) cannot exceed template duration \
             ({estimated_duration_days} days)"
        ));
    }
    Ok(())
}

/// Due date for a step instance: journey start plus the blueprint offset.
pub fn due_date(journey_start: Date, due_days_from_start: i32) -> Date {
    journey_start + Duration::days(due_days_from_start as i64)
}

/// A step is overdue when today is past its due date and it is not
/// completed.
pub fn is_overdue(today: Date, due: Date, status: StepStatus) -> bool {
    status != StepStatus::Completed && today > due
}

/// Display-friendly responsible party for a blueprint step.
///
/// Falls back to the free-text role, then to "Unassigned".
pub fn responsible_display(
    responsible_party_name: Option<&str>,
    responsible_role: Option<&str>,
) -> String {
    if let Some(name) = responsible_party_name {
        name.to_string()
    } else if let Some(role) = responsible_role {
        role.to_string()
    } else {
        "Unassigned".to_string()
    }
}
