//! Handlers for the user directory.
//!
//! User creation generates a temporary password and, when SMTP is
//! configured, emails the credentials in the background. The password is
//! also returned once in the creation response for manual hand-off.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use crewpath_core::error::CoreError;
use crewpath_core::password;
use crewpath_core::types::DbId;
use crewpath_db::models::user::{CreateUser, User};
use crewpath_db::repositories::UserRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for user creation.
///
/// `initial_password` is only ever present here; it is not stored and
/// cannot be retrieved again.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    #[serde(flatten)]
    pub user: User,
    pub initial_password: String,
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::create(&state.pool, &input).await?;
    let initial_password = password::generate_default();

    if let Some(email) = &state.email {
        let email = Arc::clone(email);
        let to = user.email.clone();
        let username = user.username.clone();
        let pw = initial_password.clone();
        // Best effort; a delivery failure must not fail the creation.
        tokio::spawn(async move {
            if let Err(err) = email.send_credentials(&to, &username, &pw).await {
                tracing::warn!(to = %to, error = %err, "Failed to send credentials email");
            }
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedUser {
                user,
                initial_password,
            },
        }),
    ))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user_id,
        }))?;
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/accounts/{id}/users
pub async fn list_for_account(
    State(state): State<AppState>,
    Path(account_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list_by_account(&state.pool, account_id).await?;
    Ok(Json(DataResponse { data: users }))
}
