use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    extractors::SessionUser,
    models::{BackendUser, SyncResponse, UpdateUserInput},
    AppError, AppResult, AppState,
};

/// POST /api/users/sync
#[utoipa::path(
    post,
    path = "/api/users/sync",
    responses(
        (status = 200, description = "Signed-in user exists on the backend, or the backend was unreachable", body = SyncResponse),
        (status = 401, description = "Not signed in")
    ),
    tag = "users",
    security(("session_cookie" = []))
)]
pub async fn sync_user(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
) -> AppResult<Json<SyncResponse>> {
    let outcome = state.backend.users().sync_session_user(&user).await?;
    Ok(Json(outcome))
}

/// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Backend record of the signed-in user", body = BackendUser),
        (status = 404, description = "User not synced yet"),
        (status = 503, description = "Backend unavailable")
    ),
    tag = "users",
    security(("session_cookie" = []))
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
) -> AppResult<Json<BackendUser>> {
    let record = state
        .backend
        .users()
        .get_user_by_email(&user.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.email)))?;

    Ok(Json(record))
}

/// PUT /api/users/me
#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpdateUserInput,
    responses(
        (status = 200, description = "User updated", body = BackendUser),
        (status = 422, description = "Nothing to update")
    ),
    tag = "users",
    security(("session_cookie" = []))
)]
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<BackendUser>> {
    if input.name.is_none() && input.image.is_none() {
        return Err(AppError::Validation("Provide a name or an image to update".to_string()));
    }

    let updated = state.backend.users().update_user(&user.email, &input).await?;
    Ok(Json(updated))
}
