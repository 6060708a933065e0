//! Handlers for job titles.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use crewpath_db::models::job_title::CreateJobTitle;
use crewpath_db::repositories::JobTitleRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/job-titles
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let titles = JobTitleRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: titles }))
}

/// POST /api/v1/job-titles
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateJobTitle>,
) -> AppResult<impl IntoResponse> {
    let title = JobTitleRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: title })))
}
