//! Handlers for the permission catalog and grant resolution.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use crewpath_core::types::DbId;
use crewpath_db::models::permission::{AssignRolePermission, CreatePermission};
use crewpath_db::repositories::PermissionRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/permissions
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let permissions = PermissionRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: permissions }))
}

/// POST /api/v1/permissions
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePermission>,
) -> AppResult<impl IntoResponse> {
    let permission = PermissionRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: permission })))
}

/// POST /api/v1/roles/{id}/permissions
///
/// Grants or denies a permission to the role; an existing pair is
/// updated in place.
pub async fn assign_to_role(
    State(state): State<AppState>,
    Path(role_id): Path<DbId>,
    Json(input): Json<AssignRolePermission>,
) -> AppResult<impl IntoResponse> {
    let assigned = PermissionRepo::assign_to_role(&state.pool, role_id, &input).await?;
    Ok(Json(DataResponse { data: assigned }))
}

/// DELETE /api/v1/roles/{id}/permissions/{permission_id}
pub async fn remove_from_role(
    State(state): State<AppState>,
    Path((role_id, permission_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let removed = PermissionRepo::remove_from_role(&state.pool, role_id, permission_id).await?;
    if removed {
        tracing::info!(role_id, permission_id, "Removed role permission");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// GET /api/v1/roles/{id}/permissions
///
/// The role's granted permissions grouped by category.
pub async fn list_for_role(
    State(state): State<AppState>,
    Path(role_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let grouped = PermissionRepo::role_permissions_by_category(&state.pool, role_id).await?;
    Ok(Json(DataResponse { data: grouped }))
}

/// GET /api/v1/users/{id}/permissions
///
/// The user's effective permission codenames: role grants minus denies,
/// unioned with direct grants.
pub async fn effective_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let effective = PermissionRepo::effective_permissions(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: effective }))
}

/// POST /api/v1/users/{id}/permissions/{permission_id}
pub async fn grant_direct(
    State(state): State<AppState>,
    Path((user_id, permission_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    PermissionRepo::grant_direct(&state.pool, user_id, permission_id).await?;

    tracing::info!(user_id, permission_id, "Granted direct permission");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/{id}/permissions/{permission_id}
pub async fn revoke_direct(
    State(state): State<AppState>,
    Path((user_id, permission_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let revoked = PermissionRepo::revoke_direct(&state.pool, user_id, permission_id).await?;
    if revoked {
        tracing::info!(user_id, permission_id, "Revoked direct permission");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}
