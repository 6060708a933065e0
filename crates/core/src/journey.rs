//! Journey lifecycle state machine and derived metrics.
//!
//! This module lives in `core` (zero internal deps) so the repository
//! layer and the API layer share one definition of the lifecycle:
//!
//! ```text
//! not_started --start()--> in_progress --complete()--> completed
//! in_progress --hold()--> on_hold --complete()--> completed
//! not_started/in_progress/on_hold --cancel()--> cancelled
//! ```
//!
//! All computations here are pure; the caller loads the rows and passes
//! the relevant fields in.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::types::Date;

// ---------------------------------------------------------------------------
// Journey type
// ---------------------------------------------------------------------------

pub const JOURNEY_TYPE_ONBOARDING: &str = "onboarding";
pub const JOURNEY_TYPE_OFFBOARDING: &str = "offboarding";

/// All valid journey type strings.
pub const VALID_JOURNEY_TYPES: &[&str] = &[JOURNEY_TYPE_ONBOARDING, JOURNEY_TYPE_OFFBOARDING];

/// Whether a template describes an onboarding or an offboarding process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyType {
    Onboarding,
    Offboarding,
}

impl JourneyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onboarding => JOURNEY_TYPE_ONBOARDING,
            Self::Offboarding => JOURNEY_TYPE_OFFBOARDING,
        }
    }

    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            JOURNEY_TYPE_ONBOARDING => Ok(Self::Onboarding),
            JOURNEY_TYPE_OFFBOARDING => Ok(Self::Offboarding),
            _ => Err(format!(
                "Invalid journey type '{s}'. Must be one of: {}",
                VALID_JOURNEY_TYPES.join(", ")
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Journey status + state machine
// ---------------------------------------------------------------------------

pub const STATUS_NOT_STARTED: &str = "not_started";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_ON_HOLD: &str = "on_hold";

/// All valid journey status strings.
pub const VALID_JOURNEY_STATUSES: &[&str] = &[
    STATUS_NOT_STARTED,
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
    STATUS_ON_HOLD,
];

/// Current lifecycle state of a journey instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStatus {
    NotStarted,
    InProgress,
    Completed,
    Cancelled,
    OnHold,
}

impl JourneyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => STATUS_NOT_STARTED,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Completed => STATUS_COMPLETED,
            Self::Cancelled => STATUS_CANCELLED,
            Self::OnHold => STATUS_ON_HOLD,
        }
    }

    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_NOT_STARTED => Ok(Self::NotStarted),
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_CANCELLED => Ok(Self::Cancelled),
            STATUS_ON_HOLD => Ok(Self::OnHold),
            _ => Err(format!(
                "Invalid journey status '{s}'. Must be one of: {}",
                VALID_JOURNEY_STATUSES.join(", ")
            )),
        }
    }

    /// Valid target states reachable from this state.
    ///
    /// Terminal states (completed, cancelled) return an empty slice.
    pub fn valid_transitions(&self) -> &'static [JourneyStatus] {
        match self {
            Self::NotStarted => &[Self::InProgress, Self::Cancelled],
            Self::InProgress => &[Self::Completed, Self::OnHold, Self::Cancelled],
            Self::OnHold => &[Self::Completed, Self::InProgress, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    pub fn can_transition(&self, to: JourneyStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// `start()` is only a valid operation from `not_started`.
    pub fn can_start(&self) -> bool {
        *self == Self::NotStarted
    }

    /// `complete()` is only a valid operation from `in_progress` or `on_hold`.
    pub fn can_complete(&self) -> bool {
        matches!(self, Self::InProgress | Self::OnHold)
    }

    /// Cancellation is allowed from any non-terminal state.
    pub fn can_cancel(&self) -> bool {
        self.can_transition(Self::Cancelled)
    }
}

// ---------------------------------------------------------------------------
// Derived metrics
// ---------------------------------------------------------------------------

/// Expected completion date: journey start plus the template's estimated
/// duration in days.
pub fn expected_completion_date(start_date: Date, estimated_duration_days: i32) -> Date {
    start_date + Duration::days(estimated_duration_days as i64)
}

/// Completion percentage rounded to one decimal place.
///
/// Defined as 0.0 when `total_steps` is 0.
pub fn progress_percentage(completed_steps: i32, total_steps: i32) -> f64 {
    if total_steps <= 0 {
        return 0.0;
    }
    let raw = (completed_steps as f64 / total_steps as f64) * 100.0;
    (raw * 10.0).round() / 10.0
}

/// A journey is overdue when today is past its expected completion date
/// and it has not completed. Never overdue without an expected date.
pub fn is_overdue(today: Date, expected_completion: Option<Date>, status: JourneyStatus) -> bool {
    match expected_completion {
        Some(expected) => status != JourneyStatus::Completed && today > expected,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -----------------------------------------------------------------------
    // State machine
    // -----------------------------------------------------------------------

    #[test]
    fn not_started_can_start() {
        assert!(JourneyStatus::NotStarted.can_start());
        assert!(!JourneyStatus::InProgress.can_start());
        assert!(!JourneyStatus::Completed.can_start());
    }

    #[test]
    fn complete_requires_in_progress_or_on_hold() {
        assert!(JourneyStatus::InProgress.can_complete());
        assert!(JourneyStatus::OnHold.can_complete());
        assert!(!JourneyStatus::NotStarted.can_complete());
        assert!(!JourneyStatus::Completed.can_complete());
        assert!(!JourneyStatus::Cancelled.can_complete());
    }

    #[test]
    fn cancel_allowed_from_all_non_terminal_states() {
        assert!(JourneyStatus::NotStarted.can_cancel());
        assert!(JourneyStatus::InProgress.can_cancel());
        assert!(JourneyStatus::OnHold.can_cancel());
        assert!(!JourneyStatus::Completed.can_cancel());
        assert!(!JourneyStatus::Cancelled.can_cancel());
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        assert!(JourneyStatus::Completed.valid_transitions().is_empty());
        assert!(JourneyStatus::Cancelled.valid_transitions().is_empty());
    }

    #[test]
    fn on_hold_can_resume() {
        assert!(JourneyStatus::OnHold.can_transition(JourneyStatus::InProgress));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in VALID_JOURNEY_STATUSES {
            let parsed = JourneyStatus::from_str_value(s).unwrap();
            assert_eq!(parsed.as_str(), *s);
        }
        assert!(JourneyStatus::from_str_value("paused").is_err());
    }

    #[test]
    fn journey_type_round_trips_through_strings() {
        for t in VALID_JOURNEY_TYPES {
            let parsed = JourneyType::from_str_value(t).unwrap();
            assert_eq!(parsed.as_str(), *t);
        }
        assert!(JourneyType::from_str_value("crossboarding").is_err());
    }

    // -----------------------------------------------------------------------
    // Progress
    // -----------------------------------------------------------------------

    #[test]
    fn progress_is_zero_for_empty_journey() {
        assert_eq!(progress_percentage(0, 0), 0.0);
    }

    #[test]
    fn progress_is_hundred_when_all_steps_done() {
        assert_eq!(progress_percentage(3, 3), 100.0);
    }

    #[test]
    fn progress_rounds_to_one_decimal() {
        // 1/3 = 33.333... -> 33.3
        assert_eq!(progress_percentage(1, 3), 33.3);
        // 2/3 = 66.666... -> 66.7
        assert_eq!(progress_percentage(2, 3), 66.7);
    }

    #[test]
    fn progress_partial() {
        assert_eq!(progress_percentage(1, 4), 25.0);
    }

    // -----------------------------------------------------------------------
    // Expected completion + overdue
    // -----------------------------------------------------------------------

    #[test]
    fn expected_completion_adds_duration() {
        let start = date(2024, 1, 1);
        assert_eq!(expected_completion_date(start, 14), date(2024, 1, 15));
    }

    #[test]
    fn overdue_when_past_expected_date() {
        let expected = Some(date(2024, 1, 15));
        assert!(is_overdue(
            date(2024, 1, 16),
            expected,
            JourneyStatus::InProgress
        ));
    }

    #[test]
    fn not_overdue_on_the_expected_date() {
        let expected = Some(date(2024, 1, 15));
        assert!(!is_overdue(
            date(2024, 1, 15),
            expected,
            JourneyStatus::InProgress
        ));
    }

    #[test]
    fn completed_journey_is_never_overdue() {
        let expected = Some(date(2024, 1, 15));
        assert!(!is_overdue(
            date(2025, 6, 1),
            expected,
            JourneyStatus::Completed
        ));
    }

    #[test]
    fn no_expected_date_means_not_overdue() {
        assert!(!is_overdue(date(2024, 1, 16), None, JourneyStatus::InProgress));
    }
}
