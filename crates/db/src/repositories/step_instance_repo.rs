//! Repository for journey step instances.
//!
//! Tracks per-journey step progress. Completion is the interesting
//! path: it recounts the journey's completed steps and auto-completes
//! the journey itself when every step is done, all inside one
//! transaction.

use chrono::{NaiveDate, Utc};
use crewpath_core::error::CoreError;
use crewpath_core::journey::JourneyStatus;
use crewpath_core::step::StepStatus;
use crewpath_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::step_instance::JourneyStepInstance;
use crate::repositories::JourneyRepo;

/// Column list shared across step instance queries.
const COLUMNS: &str = "id, journey_id, step_template_id, assigned_to, status, \
    due_date, started_date, completed_date, completion_notes, completed_by, \
    created_by, created_at, updated_at";

/// Provides tracking operations for journey step instances.
pub struct StepInstanceRepo;

impl StepInstanceRepo {
    /// Mark a step instance completed and cascade to the journey.
    ///
    /// Locks the parent journey first, then the step (same lock order
    /// as journey transitions). Already-completed steps return
    /// `Ok(false)` with no side effects, so retries are safe. After the
    /// step flips, completed siblings are recounted and persisted on
    /// the journey; when the count reaches the journey's step total and
    /// the journey is still completable, the journey is completed with
    /// today's date.
    pub async fn mark_completed(
        pool: &PgPool,
        step_instance_id: DbId,
        completed_by: Option<DbId>,
        notes: Option<&str>,
    ) -> DbResult<bool> {
        Self::mark_completed_on(
            pool,
            step_instance_id,
            completed_by,
            notes,
            Utc::now().date_naive(),
        )
        .await
    }

    /// Mark a step instance completed as of an explicit date.
    pub async fn mark_completed_on(
        pool: &PgPool,
        step_instance_id: DbId,
        completed_by: Option<DbId>,
        notes: Option<&str>,
        today: NaiveDate,
    ) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let (journey_id,): (DbId,) = sqlx::query_as(
            "SELECT journey_id FROM journey_step_instances WHERE id = $1",
        )
        .bind(step_instance_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "journey_step_instance",
            id: step_instance_id,
        })?;

        let journey = JourneyRepo::lock_for_update(&mut tx, journey_id).await?;

        let query = format!(
            "SELECT {COLUMNS} FROM journey_step_instances WHERE id = $1 FOR UPDATE"
        );
        let step = sqlx::query_as::<_, JourneyStepInstance>(&query)
            .bind(step_instance_id)
            .fetch_one(&mut *tx)
            .await?;
        let status = step.parsed_status().map_err(CoreError::Internal)?;
        if !status.can_complete() {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE journey_step_instances
             SET status = $2, completed_date = NOW(), completed_by = $3,
                 completion_notes = COALESCE($4, completion_notes)
             WHERE id = $1",
        )
        .bind(step_instance_id)
        .bind(StepStatus::Completed.as_str())
        .bind(completed_by)
        .bind(notes)
        .execute(&mut *tx)
        .await?;

        let (completed_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM journey_step_instances
             WHERE journey_id = $1 AND status = $2",
        )
        .bind(journey_id)
        .bind(StepStatus::Completed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE journey_instances SET completed_steps = $2 WHERE id = $1")
            .bind(journey_id)
            .bind(completed_count as i32)
            .execute(&mut *tx)
            .await?;

        let journey_status = journey.parsed_status().map_err(CoreError::Internal)?;
        let all_done =
            journey.total_steps > 0 && completed_count as i32 >= journey.total_steps;
        if all_done && journey_status.can_complete() {
            sqlx::query(
                "UPDATE journey_instances
                 SET status = $2, actual_completion_date = $3, completed_steps = total_steps
                 WHERE id = $1",
            )
            .bind(journey_id)
            .bind(JourneyStatus::Completed.as_str())
            .bind(today)
            .execute(&mut *tx)
            .await?;
            tracing::info!(journey_id, "All steps completed, auto-completing journey");
        }

        tx.commit().await?;

        tracing::info!(
            step_instance_id,
            journey_id,
            completed_count,
            "Marked step instance completed"
        );
        Ok(true)
    }

    /// Move a pending step to `in_progress`, stamping `started_date`.
    ///
    /// Returns `Ok(false)` when the step is not pending.
    pub async fn start(pool: &PgPool, step_instance_id: DbId) -> DbResult<bool> {
        let query = format!(
            "UPDATE journey_step_instances
             SET status = $2, started_date = NOW()
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, JourneyStepInstance>(&query)
            .bind(step_instance_id)
            .bind(StepStatus::InProgress.as_str())
            .bind(StepStatus::Pending.as_str())
            .fetch_optional(pool)
            .await?;

        if updated.is_none() {
            // Distinguish a missing row from a bad state.
            let exists: (bool,) = sqlx::query_as(
                "SELECT EXISTS (SELECT 1 FROM journey_step_instances WHERE id = $1)",
            )
            .bind(step_instance_id)
            .fetch_one(pool)
            .await?;
            if !exists.0 {
                return Err(CoreError::NotFound {
                    entity: "journey_step_instance",
                    id: step_instance_id,
                }
                .into());
            }
            return Ok(false);
        }
        Ok(true)
    }

    /// Mark a step skipped. Skipped steps never count toward progress.
    pub async fn skip(pool: &PgPool, step_instance_id: DbId) -> DbResult<bool> {
        Self::set_status(pool, step_instance_id, StepStatus::Skipped).await
    }

    /// Mark a step blocked.
    pub async fn block(pool: &PgPool, step_instance_id: DbId) -> DbResult<bool> {
        Self::set_status(pool, step_instance_id, StepStatus::Blocked).await
    }

    /// Set an open step's status. Completed steps are immutable here.
    async fn set_status(
        pool: &PgPool,
        step_instance_id: DbId,
        target: StepStatus,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE journey_step_instances
             SET status = $2
             WHERE id = $1 AND status <> $3",
        )
        .bind(step_instance_id)
        .bind(target.as_str())
        .bind(StepStatus::Completed.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reassign a step instance to another user.
    pub async fn reassign(
        pool: &PgPool,
        step_instance_id: DbId,
        assigned_to: Option<DbId>,
    ) -> DbResult<JourneyStepInstance> {
        let query = format!(
            "UPDATE journey_step_instances SET assigned_to = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JourneyStepInstance>(&query)
            .bind(step_instance_id)
            .bind(assigned_to)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "journey_step_instance",
                    id: step_instance_id,
                }
                .into()
            })
    }

    /// Find a step instance by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<JourneyStepInstance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM journey_step_instances WHERE id = $1");
        sqlx::query_as::<_, JourneyStepInstance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A journey's step instances in blueprint order.
    pub async fn list_by_journey(
        pool: &PgPool,
        journey_id: DbId,
    ) -> Result<Vec<JourneyStepInstance>, sqlx::Error> {
        let query = format!(
            "SELECT si.{} FROM journey_step_instances si
             JOIN journey_steps s ON s.id = si.step_template_id
             WHERE si.journey_id = $1
             ORDER BY s.step_order, s.due_days_from_start",
            COLUMNS.replace(", ", ", si.")
        );
        sqlx::query_as::<_, JourneyStepInstance>(&query)
            .bind(journey_id)
            .fetch_all(pool)
            .await
    }

    /// Open step instances assigned to a user, soonest due first.
    pub async fn list_by_assignee(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<JourneyStepInstance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM journey_step_instances
             WHERE assigned_to = $1 AND status IN ($2, $3)
             ORDER BY due_date"
        );
        sqlx::query_as::<_, JourneyStepInstance>(&query)
            .bind(user_id)
            .bind(StepStatus::Pending.as_str())
            .bind(StepStatus::InProgress.as_str())
            .fetch_all(pool)
            .await
    }

    /// Open step instances past their due date.
    pub async fn list_overdue(
        pool: &PgPool,
        today: NaiveDate,
    ) -> Result<Vec<JourneyStepInstance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM journey_step_instances
             WHERE due_date < $1 AND status IN ($2, $3)
             ORDER BY due_date"
        );
        sqlx::query_as::<_, JourneyStepInstance>(&query)
            .bind(today)
            .bind(StepStatus::Pending.as_str())
            .bind(StepStatus::InProgress.as_str())
            .fetch_all(pool)
            .await
    }
}
