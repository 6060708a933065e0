//! Repository for journey templates and their step blueprints.
//!
//! Implements the template catalog: template creation with the
//! single-default invariant, step creation with due-offset validation,
//! deep duplication, and deterministic step ordering.

use crewpath_core::error::{
    CoreError, CONSTRAINT_DUPLICATE_TEMPLATE, CONSTRAINT_DURATION_EXCEEDED,
    CONSTRAINT_UNIQUE_DEFAULT,
};
use crewpath_core::journey::JourneyType;
use crewpath_core::step;
use crewpath_core::types::DbId;
use sqlx::PgPool;

use crate::error::{unique_constraint, DbResult};
use crate::models::step::{CreateJourneyStep, JourneyStep};
use crate::models::template::{CreateJourneyTemplate, JourneyTemplate};

/// Column list shared across template queries.
const COLUMNS: &str = "id, account_id, journey_type, title, description, job_title_id, \
    department, business_unit, estimated_duration_days, is_active, is_default, \
    created_by, created_at, updated_at";

/// Column list shared across step queries.
const STEP_COLUMNS: &str = "id, template_id, title, description, step_type, \
    responsible_party_id, responsible_role, due_days_from_start, \
    estimated_duration_hours, step_order, is_mandatory, is_blocking, \
    requires_approval, auto_assign, notes, is_active, created_at, updated_at";

/// Provides catalog operations for journey templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Create a journey template.
    ///
    /// Runs in one transaction: validates the journey type, checks the
    /// (account, type, job title, title) uniqueness and — when
    /// `is_default` is requested — the single-default invariant before
    /// writing. The partial unique indexes back these checks up under
    /// concurrent writers, so a race loser still gets the typed error.
    pub async fn create(
        pool: &PgPool,
        input: &CreateJourneyTemplate,
    ) -> DbResult<JourneyTemplate> {
        JourneyType::from_str_value(&input.journey_type)
            .map_err(|msg| CoreError::validation("invalid-journey-type", msg))?;

        let mut tx = pool.begin().await?;

        let title_taken: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM journey_templates
                WHERE account_id = $1 AND journey_type = $2
                  AND COALESCE(job_title_id, 0) = COALESCE($3, 0)
                  AND title = $4
             )",
        )
        .bind(input.account_id)
        .bind(&input.journey_type)
        .bind(input.job_title_id)
        .bind(&input.title)
        .fetch_one(&mut *tx)
        .await?;
        if title_taken.0 {
            return Err(CoreError::validation(
                CONSTRAINT_DUPLICATE_TEMPLATE,
                format!(
                    "A {} template titled '{}' already exists in this scope",
                    input.journey_type, input.title
                ),
            )
            .into());
        }

        if input.is_default.unwrap_or(false) {
            let default_exists: (bool,) = sqlx::query_as(
                "SELECT EXISTS (
                    SELECT 1 FROM journey_templates
                    WHERE account_id = $1 AND journey_type = $2
                      AND COALESCE(job_title_id, 0) = COALESCE($3, 0)
                      AND is_default
                 )",
            )
            .bind(input.account_id)
            .bind(&input.journey_type)
            .bind(input.job_title_id)
            .fetch_one(&mut *tx)
            .await?;
            if default_exists.0 {
                return Err(CoreError::conflict(
                    CONSTRAINT_UNIQUE_DEFAULT,
                    format!(
                        "A default {} template already exists for this scope",
                        input.journey_type
                    ),
                )
                .into());
            }
        }

        let query = format!(
            "INSERT INTO journey_templates
                (account_id, journey_type, title, description, job_title_id,
                 department, business_unit, estimated_duration_days, is_default, created_by)
             VALUES ($1, $2, $3, COALESCE($4, ''), $5, $6, $7, $8, COALESCE($9, FALSE), $10)
             RETURNING {COLUMNS}"
        );
        let template = sqlx::query_as::<_, JourneyTemplate>(&query)
            .bind(input.account_id)
            .bind(&input.journey_type)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.job_title_id)
            .bind(&input.department)
            .bind(&input.business_unit)
            .bind(input.estimated_duration_days)
            .bind(input.is_default)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| Self::classify_template_unique(err, &input.journey_type))?;

        tx.commit().await?;

        tracing::info!(
            template_id = template.id,
            account_id = template.account_id,
            journey_type = %template.journey_type,
            "Created journey template"
        );
        Ok(template)
    }

    /// Add a step blueprint to a template.
    ///
    /// Fails with a `duration-exceeded` validation error when the step's
    /// due offset is past the template's estimated duration. Assigns the
    /// next `step_order` (max + 1 within the template) when unspecified.
    pub async fn add_step(
        pool: &PgPool,
        template_id: DbId,
        input: &CreateJourneyStep,
    ) -> DbResult<JourneyStep> {
        let template = Self::find_by_id(pool, template_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "journey_template",
                id: template_id,
            })?;

        step::validate_step_type(&input.step_type)
            .map_err(|msg| CoreError::validation("invalid-step-type", msg))?;
        step::validate_due_days(input.due_days_from_start, template.estimated_duration_days)
            .map_err(|msg| CoreError::validation(CONSTRAINT_DURATION_EXCEEDED, msg))?;

        let query = format!(
            "INSERT INTO journey_steps
                (template_id, title, description, step_type, responsible_party_id,
                 responsible_role, due_days_from_start, estimated_duration_hours,
                 step_order, is_mandatory, is_blocking, requires_approval, auto_assign, notes)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5, $6, $7, $8,
                 COALESCE($9, (SELECT COALESCE(MAX(step_order), 0) + 1
                               FROM journey_steps WHERE template_id = $1)),
                 COALESCE($10, TRUE), COALESCE($11, FALSE),
                 COALESCE($12, FALSE), COALESCE($13, TRUE), COALESCE($14, ''))
             RETURNING {STEP_COLUMNS}"
        );
        let created = sqlx::query_as::<_, JourneyStep>(&query)
            .bind(template_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.step_type)
            .bind(input.responsible_party_id)
            .bind(&input.responsible_role)
            .bind(input.due_days_from_start)
            .bind(input.estimated_duration_hours)
            .bind(input.step_order)
            .bind(input.is_mandatory)
            .bind(input.is_blocking)
            .bind(input.requires_approval)
            .bind(input.auto_assign)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
            .map_err(|err| {
                match unique_constraint(&err).as_deref() {
                    Some("uq_journey_steps_template_order") => CoreError::conflict(
                        "duplicate-step-order",
                        format!("Template already has a step at order {:?}", input.step_order),
                    )
                    .into(),
                    _ => crate::DbError::Sqlx(err),
                }
            })?;

        Ok(created)
    }

    /// Deep-copy a template and all of its steps.
    ///
    /// The copy's title is suffixed " (Copy)", it is never marked
    /// default, and step order and responsibility fields are preserved.
    pub async fn duplicate(pool: &PgPool, template_id: DbId) -> DbResult<JourneyTemplate> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM journey_templates WHERE id = $1");
        let source = sqlx::query_as::<_, JourneyTemplate>(&query)
            .bind(template_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "journey_template",
                id: template_id,
            })?;

        let insert = format!(
            "INSERT INTO journey_templates
                (account_id, journey_type, title, description, job_title_id,
                 department, business_unit, estimated_duration_days, is_default, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9)
             RETURNING {COLUMNS}"
        );
        let copy = sqlx::query_as::<_, JourneyTemplate>(&insert)
            .bind(source.account_id)
            .bind(&source.journey_type)
            .bind(format!("{} (Copy)", source.title))
            .bind(&source.description)
            .bind(source.job_title_id)
            .bind(&source.department)
            .bind(&source.business_unit)
            .bind(source.estimated_duration_days)
            .bind(source.created_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| Self::classify_template_unique(err, &source.journey_type))?;

        sqlx::query(
            "INSERT INTO journey_steps
                (template_id, title, description, step_type, responsible_party_id,
                 responsible_role, due_days_from_start, estimated_duration_hours,
                 step_order, is_mandatory, is_blocking, requires_approval, auto_assign,
                 notes, is_active)
             SELECT $1, title, description, step_type, responsible_party_id,
                 responsible_role, due_days_from_start, estimated_duration_hours,
                 step_order, is_mandatory, is_blocking, requires_approval, auto_assign,
                 notes, is_active
             FROM journey_steps WHERE template_id = $2",
        )
        .bind(copy.id)
        .bind(template_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            source_id = template_id,
            copy_id = copy.id,
            "Duplicated journey template"
        );
        Ok(copy)
    }

    /// Find a template by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<JourneyTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM journey_templates WHERE id = $1");
        sqlx::query_as::<_, JourneyTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an account's templates, optionally filtered by journey type.
    pub async fn list_by_account(
        pool: &PgPool,
        account_id: DbId,
        journey_type: Option<&str>,
    ) -> Result<Vec<JourneyTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM journey_templates
             WHERE account_id = $1 AND ($2::text IS NULL OR journey_type = $2)
             ORDER BY journey_type, department NULLS LAST, title"
        );
        sqlx::query_as::<_, JourneyTemplate>(&query)
            .bind(account_id)
            .bind(journey_type)
            .fetch_all(pool)
            .await
    }

    /// A template's steps in execution order.
    ///
    /// Sorted by (step_order, due_days_from_start) — a stable,
    /// deterministic tie-break.
    pub async fn ordered_steps(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<JourneyStep>, sqlx::Error> {
        let query = format!(
            "SELECT {STEP_COLUMNS} FROM journey_steps
             WHERE template_id = $1
             ORDER BY step_order, due_days_from_start"
        );
        sqlx::query_as::<_, JourneyStep>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// Number of steps in a template.
    pub async fn step_count(pool: &PgPool, template_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM journey_steps WHERE template_id = $1")
                .bind(template_id)
                .fetch_one(pool)
                .await?;
        Ok(count.0)
    }

    /// Map template unique violations (race losers) to their typed errors.
    fn classify_template_unique(err: sqlx::Error, journey_type: &str) -> crate::DbError {
        match unique_constraint(&err).as_deref() {
            Some("uq_journey_templates_scope_title") => CoreError::validation(
                CONSTRAINT_DUPLICATE_TEMPLATE,
                "A template with this title already exists in this scope",
            )
            .into(),
            Some("uq_journey_templates_single_default") => CoreError::conflict(
                CONSTRAINT_UNIQUE_DEFAULT,
                format!("A default {journey_type} template already exists for this scope"),
            )
            .into(),
            _ => crate::DbError::Sqlx(err),
        }
    }
}
