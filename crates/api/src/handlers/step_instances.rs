//! Handlers for journey step instances.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use crewpath_core::error::CoreError;
use crewpath_core::types::DbId;
use crewpath_db::repositories::StepInstanceRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, TransitionResponse};
use crate::state::AppState;

/// Request body for step completion.
#[derive(Debug, Default, Deserialize)]
pub struct CompleteStepParams {
    pub completed_by: Option<DbId>,
    pub notes: Option<String>,
}

/// Request body for step reassignment.
#[derive(Debug, Deserialize)]
pub struct ReassignParams {
    pub assigned_to: Option<DbId>,
}

/// GET /api/v1/steps/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(step_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let step = StepInstanceRepo::find_by_id(&state.pool, step_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "journey_step_instance",
            id: step_id,
        }))?;
    Ok(Json(DataResponse { data: step }))
}

/// POST /api/v1/steps/{id}/start
pub async fn start(
    State(state): State<AppState>,
    Path(step_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transitioned = StepInstanceRepo::start(&state.pool, step_id).await?;
    Ok(Json(DataResponse {
        data: TransitionResponse { transitioned },
    }))
}

/// POST /api/v1/steps/{id}/complete
///
/// Completes the step and cascades: journey progress counters are
/// updated and the journey auto-completes when this was the last open
/// step. Re-completing a completed step reports `transitioned: false`.
pub async fn complete(
    State(state): State<AppState>,
    Path(step_id): Path<DbId>,
    Json(params): Json<CompleteStepParams>,
) -> AppResult<impl IntoResponse> {
    let transitioned = StepInstanceRepo::mark_completed(
        &state.pool,
        step_id,
        params.completed_by,
        params.notes.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse {
        data: TransitionResponse { transitioned },
    }))
}

/// POST /api/v1/steps/{id}/skip
pub async fn skip(
    State(state): State<AppState>,
    Path(step_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transitioned = StepInstanceRepo::skip(&state.pool, step_id).await?;
    Ok(Json(DataResponse {
        data: TransitionResponse { transitioned },
    }))
}

/// POST /api/v1/steps/{id}/block
pub async fn block(
    State(state): State<AppState>,
    Path(step_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transitioned = StepInstanceRepo::block(&state.pool, step_id).await?;
    Ok(Json(DataResponse {
        data: TransitionResponse { transitioned },
    }))
}

/// PUT /api/v1/steps/{id}/assignee
pub async fn reassign(
    State(state): State<AppState>,
    Path(step_id): Path<DbId>,
    Json(params): Json<ReassignParams>,
) -> AppResult<impl IntoResponse> {
    let step = StepInstanceRepo::reassign(&state.pool, step_id, params.assigned_to).await?;

    tracing::info!(step_id, assigned_to = ?params.assigned_to, "Reassigned step instance");
    Ok(Json(DataResponse { data: step }))
}

/// GET /api/v1/steps/overdue
pub async fn list_overdue(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let steps = StepInstanceRepo::list_overdue(&state.pool, today).await?;
    Ok(Json(DataResponse { data: steps }))
}

/// GET /api/v1/users/{id}/steps
///
/// The user's open (pending or in-progress) step instances, soonest due
/// first.
pub async fn list_for_assignee(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let steps = StepInstanceRepo::list_by_assignee(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: steps }))
}
