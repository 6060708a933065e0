//! Handlers for the journey template catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use crewpath_core::error::CoreError;
use crewpath_core::types::DbId;
use crewpath_db::models::step::CreateJourneyStep;
use crewpath_db::models::template::CreateJourneyTemplate;
use crewpath_db::repositories::TemplateRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for template listing.
#[derive(Debug, Deserialize)]
pub struct TemplateListParams {
    pub journey_type: Option<String>,
}

/// POST /api/v1/templates
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateJourneyTemplate>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/templates/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::find_by_id(&state.pool, template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "journey_template",
            id: template_id,
        }))?;
    Ok(Json(DataResponse { data: template }))
}

/// GET /api/v1/accounts/{id}/templates
pub async fn list_for_account(
    State(state): State<AppState>,
    Path(account_id): Path<DbId>,
    Query(params): Query<TemplateListParams>,
) -> AppResult<impl IntoResponse> {
    let templates =
        TemplateRepo::list_by_account(&state.pool, account_id, params.journey_type.as_deref())
            .await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/templates/{id}/duplicate
pub async fn duplicate(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let copy = TemplateRepo::duplicate(&state.pool, template_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: copy })))
}

/// POST /api/v1/templates/{id}/steps
pub async fn add_step(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(input): Json<CreateJourneyStep>,
) -> AppResult<impl IntoResponse> {
    let step = TemplateRepo::add_step(&state.pool, template_id, &input).await?;

    tracing::info!(
        template_id,
        step_id = step.id,
        step_order = step.step_order,
        "Added template step"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: step })))
}

/// GET /api/v1/templates/{id}/steps
pub async fn list_steps(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let steps = TemplateRepo::ordered_steps(&state.pool, template_id).await?;
    Ok(Json(DataResponse { data: steps }))
}
