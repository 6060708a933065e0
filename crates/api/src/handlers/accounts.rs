//! Handlers for tenant accounts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use crewpath_core::error::CoreError;
use crewpath_core::types::DbId;
use crewpath_db::models::account::CreateAccount;
use crewpath_db::repositories::AccountRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/accounts
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let accounts = AccountRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: accounts }))
}

/// POST /api/v1/accounts
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateAccount>,
) -> AppResult<impl IntoResponse> {
    let account = AccountRepo::create(&state.pool, &input).await?;

    tracing::info!(account_id = account.id, name = %account.name, "Created account");
    Ok((StatusCode::CREATED, Json(DataResponse { data: account })))
}

/// GET /api/v1/accounts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(account_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let account = AccountRepo::find_by_id(&state.pool, account_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "account",
            id: account_id,
        }))?;
    Ok(Json(DataResponse { data: account }))
}
