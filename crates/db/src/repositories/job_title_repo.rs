//! Repository for job titles.

use crewpath_core::error::CoreError;
use crewpath_core::types::DbId;
use sqlx::PgPool;

use crate::error::{unique_constraint, DbResult};
use crate::models::job_title::{CreateJobTitle, JobTitle};

const COLUMNS: &str = "id, title, description, department, is_active, created_at, updated_at";

/// Provides job title operations.
pub struct JobTitleRepo;

impl JobTitleRepo {
    /// Create a job title. Titles are globally unique.
    pub async fn create(pool: &PgPool, input: &CreateJobTitle) -> DbResult<JobTitle> {
        let query = format!(
            "INSERT INTO job_titles (title, description, department)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobTitle>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.department)
            .fetch_one(pool)
            .await
            .map_err(|err| match unique_constraint(&err).as_deref() {
                Some("uq_job_titles_title") => CoreError::validation(
                    "duplicate-job-title",
                    format!("A job title '{}' already exists", input.title),
                )
                .into(),
                _ => crate::DbError::Sqlx(err),
            })
    }

    /// Find a job title by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<JobTitle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_titles WHERE id = $1");
        sqlx::query_as::<_, JobTitle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active job titles by department, then title.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<JobTitle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_titles WHERE is_active ORDER BY department, title"
        );
        sqlx::query_as::<_, JobTitle>(&query).fetch_all(pool).await
    }
}
