//! Handlers for role management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use crewpath_core::error::CoreError;
use crewpath_core::types::DbId;
use crewpath_db::models::role::CreateRole;
use crewpath_db::repositories::RoleRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/roles
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let roles = RoleRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: roles }))
}

/// POST /api/v1/roles
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateRole>,
) -> AppResult<impl IntoResponse> {
    let role = RoleRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: role })))
}

/// GET /api/v1/roles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(role_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let role = RoleRepo::find_by_id(&state.pool, role_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "role",
            id: role_id,
        }))?;
    Ok(Json(DataResponse { data: role }))
}

/// PUT /api/v1/roles/{id}/default
///
/// Makes this role the single system default, clearing the previous one.
pub async fn set_default(
    State(state): State<AppState>,
    Path(role_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let role = RoleRepo::set_default(&state.pool, role_id).await?;
    Ok(Json(DataResponse { data: role }))
}
