//! Handlers for journey instances and their lifecycle.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use crewpath_core::error::CoreError;
use crewpath_core::types::DbId;
use crewpath_db::models::journey::{CreateJourneyInstance, JourneyInstance};
use crewpath_db::repositories::{JourneyRepo, StepInstanceRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, TransitionResponse};
use crate::state::AppState;

/// Journey payload enriched with derived lifecycle metrics.
#[derive(Debug, Serialize)]
pub struct JourneyDetail {
    #[serde(flatten)]
    pub journey: JourneyInstance,
    pub progress_percentage: f64,
    pub is_overdue: bool,
}

impl JourneyDetail {
    fn from_journey(journey: JourneyInstance) -> Self {
        let today = Utc::now().date_naive();
        Self {
            progress_percentage: journey.progress_percentage(),
            is_overdue: journey.is_overdue(today),
            journey,
        }
    }
}

/// Query parameters for account journey listing.
#[derive(Debug, Deserialize)]
pub struct JourneyListParams {
    pub status: Option<String>,
}

/// Request body for lifecycle endpoints that record the acting user.
#[derive(Debug, Default, Deserialize)]
pub struct ActorParams {
    pub acted_by: Option<DbId>,
}

/// POST /api/v1/journeys
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateJourneyInstance>,
) -> AppResult<impl IntoResponse> {
    let journey = JourneyRepo::create(&state.pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: JourneyDetail::from_journey(journey),
        }),
    ))
}

/// GET /api/v1/journeys/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(journey_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let journey = find_journey(&state, journey_id).await?;
    Ok(Json(DataResponse {
        data: JourneyDetail::from_journey(journey),
    }))
}

/// POST /api/v1/journeys/{id}/start
///
/// Starts the journey and materializes its step instances. A journey
/// that is already past `not_started` is left untouched and reported
/// with `transitioned: false`.
pub async fn start(
    State(state): State<AppState>,
    Path(journey_id): Path<DbId>,
    Json(params): Json<ActorParams>,
) -> AppResult<impl IntoResponse> {
    let transitioned = JourneyRepo::start(&state.pool, journey_id, params.acted_by).await?;
    Ok(Json(DataResponse {
        data: TransitionResponse { transitioned },
    }))
}

/// POST /api/v1/journeys/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(journey_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transitioned = JourneyRepo::complete(&state.pool, journey_id).await?;
    Ok(Json(DataResponse {
        data: TransitionResponse { transitioned },
    }))
}

/// POST /api/v1/journeys/{id}/hold
pub async fn hold(
    State(state): State<AppState>,
    Path(journey_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transitioned = JourneyRepo::hold(&state.pool, journey_id).await?;
    Ok(Json(DataResponse {
        data: TransitionResponse { transitioned },
    }))
}

/// POST /api/v1/journeys/{id}/resume
pub async fn resume(
    State(state): State<AppState>,
    Path(journey_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transitioned = JourneyRepo::resume(&state.pool, journey_id).await?;
    Ok(Json(DataResponse {
        data: TransitionResponse { transitioned },
    }))
}

/// POST /api/v1/journeys/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Path(journey_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transitioned = JourneyRepo::cancel(&state.pool, journey_id).await?;
    Ok(Json(DataResponse {
        data: TransitionResponse { transitioned },
    }))
}

/// GET /api/v1/journeys/{id}/steps
pub async fn list_steps(
    State(state): State<AppState>,
    Path(journey_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // 404 for unknown journeys rather than an empty list.
    find_journey(&state, journey_id).await?;
    let steps = StepInstanceRepo::list_by_journey(&state.pool, journey_id).await?;
    Ok(Json(DataResponse { data: steps }))
}

/// GET /api/v1/journeys/overdue
pub async fn list_overdue(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let journeys = JourneyRepo::list_overdue(&state.pool, today).await?;
    let details: Vec<JourneyDetail> = journeys
        .into_iter()
        .map(JourneyDetail::from_journey)
        .collect();
    Ok(Json(DataResponse { data: details }))
}

/// GET /api/v1/accounts/{id}/journeys
pub async fn list_for_account(
    State(state): State<AppState>,
    Path(account_id): Path<DbId>,
    Query(params): Query<JourneyListParams>,
) -> AppResult<impl IntoResponse> {
    let journeys =
        JourneyRepo::list_by_account(&state.pool, account_id, params.status.as_deref()).await?;
    let details: Vec<JourneyDetail> = journeys
        .into_iter()
        .map(JourneyDetail::from_journey)
        .collect();
    Ok(Json(DataResponse { data: details }))
}

/// GET /api/v1/users/{id}/journeys
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let journeys = JourneyRepo::list_by_user(&state.pool, user_id).await?;
    let details: Vec<JourneyDetail> = journeys
        .into_iter()
        .map(JourneyDetail::from_journey)
        .collect();
    Ok(Json(DataResponse { data: details }))
}

async fn find_journey(state: &AppState, journey_id: DbId) -> AppResult<JourneyInstance> {
    JourneyRepo::find_by_id(&state.pool, journey_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "journey_instance",
            id: journey_id,
        }))
}
