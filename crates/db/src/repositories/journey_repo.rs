//! Repository for journey instances.
//!
//! Owns the journey lifecycle: creation against a template, the
//! start transition that materializes step instances, completion,
//! hold/resume, and cancellation. Every transition runs in a single
//! transaction with the journey row locked `FOR UPDATE` so concurrent
//! transitions serialize instead of double-applying.

use chrono::{NaiveDate, Utc};
use crewpath_core::error::{CoreError, CONSTRAINT_DUPLICATE_INSTANCE};
use crewpath_core::journey::{self, JourneyStatus};
use crewpath_core::step::StepStatus;
use crewpath_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{unique_constraint, DbResult};
use crate::models::journey::{CreateJourneyInstance, JourneyInstance};
use crate::models::step::JourneyStep;

/// Column list shared across journey instance queries.
const COLUMNS: &str = "id, template_id, user_id, status, start_date, \
    expected_completion_date, actual_completion_date, total_steps, \
    completed_steps, notes, created_by, created_at, updated_at";

/// Provides lifecycle operations for journey instances.
pub struct JourneyRepo;

impl JourneyRepo {
    /// Create a journey instance in the `not_started` state.
    ///
    /// Step counters stay zero until the journey starts; the step
    /// snapshot is taken at start time, not at creation.
    pub async fn create(
        pool: &PgPool,
        input: &CreateJourneyInstance,
    ) -> DbResult<JourneyInstance> {
        let query = format!(
            "INSERT INTO journey_instances (template_id, user_id, notes, created_by)
             VALUES ($1, $2, COALESCE($3, ''), $4)
             RETURNING {COLUMNS}"
        );
        let journey = sqlx::query_as::<_, JourneyInstance>(&query)
            .bind(input.template_id)
            .bind(input.user_id)
            .bind(&input.notes)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
            .map_err(|err| match unique_constraint(&err).as_deref() {
                Some("uq_journey_instances_template_user") => CoreError::validation(
                    CONSTRAINT_DUPLICATE_INSTANCE,
                    "This user already has a journey for this template",
                )
                .into(),
                _ => crate::DbError::Sqlx(err),
            })?;

        tracing::info!(
            journey_id = journey.id,
            template_id = journey.template_id,
            user_id = journey.user_id,
            "Created journey instance"
        );
        Ok(journey)
    }

    /// Start a journey as of today (UTC).
    pub async fn start(
        pool: &PgPool,
        journey_id: DbId,
        started_by: Option<DbId>,
    ) -> DbResult<bool> {
        Self::start_on(pool, journey_id, started_by, Utc::now().date_naive()).await
    }

    /// Start a journey as of an explicit date.
    ///
    /// Returns `Ok(false)` without side effects when the journey is not
    /// in a startable state, so repeated calls are idempotent. On
    /// success the journey moves to `in_progress`, its expected
    /// completion date is derived from the template duration, the step
    /// snapshot counters are set, and one step instance is created per
    /// active blueprint step with its due date offset from `today`.
    pub async fn start_on(
        pool: &PgPool,
        journey_id: DbId,
        started_by: Option<DbId>,
        today: NaiveDate,
    ) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let journey = Self::lock_for_update(&mut tx, journey_id).await?;
        let status = journey
            .parsed_status()
            .map_err(CoreError::Internal)?;
        if !status.can_start() {
            tracing::warn!(
                journey_id,
                status = %journey.status,
                "Ignored start request for non-startable journey"
            );
            return Ok(false);
        }

        let (duration_days,): (i32,) = sqlx::query_as(
            "SELECT estimated_duration_days FROM journey_templates WHERE id = $1",
        )
        .bind(journey.template_id)
        .fetch_one(&mut *tx)
        .await?;

        let steps = sqlx::query_as::<_, JourneyStep>(
            "SELECT id, template_id, title, description, step_type, responsible_party_id, \
                responsible_role, due_days_from_start, estimated_duration_hours, step_order, \
                is_mandatory, is_blocking, requires_approval, auto_assign, notes, is_active, \
                created_at, updated_at
             FROM journey_steps
             WHERE template_id = $1 AND is_active
             ORDER BY step_order, due_days_from_start",
        )
        .bind(journey.template_id)
        .fetch_all(&mut *tx)
        .await?;

        let expected = journey::expected_completion_date(today, duration_days);
        sqlx::query(
            "UPDATE journey_instances
             SET status = $2, start_date = $3, expected_completion_date = $4,
                 total_steps = $5, completed_steps = 0
             WHERE id = $1",
        )
        .bind(journey_id)
        .bind(JourneyStatus::InProgress.as_str())
        .bind(today)
        .bind(expected)
        .bind(steps.len() as i32)
        .execute(&mut *tx)
        .await?;

        for step in &steps {
            let due = crewpath_core::step::due_date(today, step.due_days_from_start);
            sqlx::query(
                "INSERT INTO journey_step_instances
                    (journey_id, step_template_id, assigned_to, status, due_date, created_by)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(journey_id)
            .bind(step.id)
            .bind(step.responsible_party_id)
            .bind(StepStatus::Pending.as_str())
            .bind(due)
            .bind(started_by)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            journey_id,
            step_count = steps.len(),
            start_date = %today,
            expected_completion = %expected,
            "Started journey"
        );
        Ok(true)
    }

    /// Complete a journey as of today (UTC).
    pub async fn complete(
        pool: &PgPool,
        journey_id: DbId,
    ) -> DbResult<bool> {
        Self::complete_on(pool, journey_id, Utc::now().date_naive()).await
    }

    /// Complete a journey as of an explicit date.
    ///
    /// Force-syncs `completed_steps` to `total_steps`: explicit
    /// completion is authoritative even when individual steps remain
    /// open. Returns `Ok(false)` when the journey is not completable.
    pub async fn complete_on(
        pool: &PgPool,
        journey_id: DbId,
        today: NaiveDate,
    ) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let journey = Self::lock_for_update(&mut tx, journey_id).await?;
        let status = journey
            .parsed_status()
            .map_err(CoreError::Internal)?;
        if !status.can_complete() {
            return Ok(false);
        }

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

        tx.commit().await?;

        tracing::info!(journey_id, completion_date = %today, "Completed journey");
        Ok(true)
    }

    /// Put an in-progress journey on hold.
    pub async fn hold(pool: &PgPool, journey_id: DbId) -> DbResult<bool> {
        Self::transition(pool, journey_id, JourneyStatus::OnHold).await
    }

    /// Resume a held journey.
    pub async fn resume(pool: &PgPool, journey_id: DbId) -> DbResult<bool> {
        Self::transition(pool, journey_id, JourneyStatus::InProgress).await
    }

    /// Cancel a journey. Terminal; allowed from any non-terminal state.
    pub async fn cancel(pool: &PgPool, journey_id: DbId) -> DbResult<bool> {
        Self::transition(pool, journey_id, JourneyStatus::Cancelled).await
    }

    /// Apply a plain status transition under the row lock.
    ///
    /// Returns `Ok(false)` when the current status does not permit the
    /// target, mirroring the other no-op guards.
    async fn transition(
        pool: &PgPool,
        journey_id: DbId,
        target: JourneyStatus,
    ) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let journey = Self::lock_for_update(&mut tx, journey_id).await?;
        let status = journey
            .parsed_status()
            .map_err(CoreError::Internal)?;
        if !status.valid_transitions().contains(&target) {
            return Ok(false);
        }

        sqlx::query("UPDATE journey_instances SET status = $2 WHERE id = $1")
            .bind(journey_id)
            .bind(target.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(journey_id, from = %status.as_str(), to = %target.as_str(), "Journey status transition");
        Ok(true)
    }

    /// Lock a journey row for the duration of the transaction.
    ///
    /// Lock order is always journey before step instance; the step
    /// tracker follows the same order.
    pub(crate) async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        journey_id: DbId,
    ) -> DbResult<JourneyInstance> {
        let query = format!("SELECT {COLUMNS} FROM journey_instances WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, JourneyInstance>(&query)
            .bind(journey_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "journey_instance",
                    id: journey_id,
                }
                .into()
            })
    }

    /// Find a journey by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<JourneyInstance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM journey_instances WHERE id = $1");
        sqlx::query_as::<_, JourneyInstance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's journeys, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<JourneyInstance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM journey_instances
             WHERE user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, JourneyInstance>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List journeys for an account, optionally filtered by status.
    pub async fn list_by_account(
        pool: &PgPool,
        account_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<JourneyInstance>, sqlx::Error> {
        let query = format!(
            "SELECT j.{} FROM journey_instances j
             JOIN journey_templates t ON t.id = j.template_id
             WHERE t.account_id = $1 AND ($2::text IS NULL OR j.status = $2)
             ORDER BY j.created_at DESC",
            COLUMNS.replace(", ", ", j.")
        );
        sqlx::query_as::<_, JourneyInstance>(&query)
            .bind(account_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Journeys past their expected completion date and still open.
    pub async fn list_overdue(
        pool: &PgPool,
        today: NaiveDate,
    ) -> Result<Vec<JourneyInstance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM journey_instances
             WHERE expected_completion_date < $1
               AND status IN ($2, $3)
             ORDER BY expected_completion_date"
        );
        sqlx::query_as::<_, JourneyInstance>(&query)
            .bind(today)
            .bind(JourneyStatus::InProgress.as_str())
            .bind(JourneyStatus::OnHold.as_str())
            .fetch_all(pool)
            .await
    }
}
