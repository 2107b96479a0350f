use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    extractors::SessionUser,
    models::{OooMutationResponse, OooStatus, OooSummary, OooView, UpsertOooInput},
    AppResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct OooListQuery {
    /// all (default), team or my
    #[serde(default)]
    pub view: OooView,
}

/// GET /api/ooo
#[utoipa::path(
    get,
    path = "/api/ooo",
    params(OooListQuery),
    responses(
        (status = 200, description = "OOO records", body = Vec<OooStatus>),
        (status = 503, description = "Backend unavailable")
    ),
    tag = "ooo",
    security(("session_cookie" = []))
)]
pub async fn list_ooo(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Query(query): Query<OooListQuery>,
) -> AppResult<Json<Vec<OooStatus>>> {
    let statuses = state.backend.ooo().get_all().await?;
    Ok(Json(query.view.apply(statuses, &user.email)))
}

/// GET /api/ooo/summary
#[utoipa::path(
    get,
    path = "/api/ooo/summary",
    responses(
        (status = 200, description = "Active and inactive counts", body = OooSummary)
    ),
    tag = "ooo",
    security(("session_cookie" = []))
)]
pub async fn ooo_summary(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
) -> AppResult<Json<OooSummary>> {
    let statuses = state.backend.ooo().get_all().await?;
    Ok(Json(OooSummary::from_statuses(
        statuses,
        chrono::Utc::now().date_naive(),
    )))
}

/// GET /api/ooo/me
#[utoipa::path(
    get,
    path = "/api/ooo/me",
    responses(
        (status = 200, description = "The signed-in user's OOO record, or null", body = Option<OooStatus>)
    ),
    tag = "ooo",
    security(("session_cookie" = []))
)]
pub async fn get_my_ooo(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
) -> AppResult<Json<Option<OooStatus>>> {
    let status = state.backend.ooo().get_status(&user.email).await?;
    Ok(Json(status))
}

/// POST /api/ooo
#[utoipa::path(
    post,
    path = "/api/ooo",
    request_body = UpsertOooInput,
    responses(
        (status = 200, description = "OOO status saved", body = OooMutationResponse),
        (status = 422, description = "Validation failed")
    ),
    tag = "ooo",
    security(("session_cookie" = []))
)]
pub async fn upsert_ooo(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Json(input): Json<UpsertOooInput>,
) -> AppResult<Json<OooMutationResponse>> {
    input.validate()?;

    // Stamp with the session identity
    let request = input.into_request(user.name, user.email);
    let response = state.backend.ooo().update_status(&request).await?;

    tracing::info!(email = %request.user_email, active = request.active, "OOO status saved");
    Ok(Json(response))
}

/// DELETE /api/ooo/me
#[utoipa::path(
    delete,
    path = "/api/ooo/me",
    responses(
        (status = 200, description = "OOO status removed")
    ),
    tag = "ooo",
    security(("session_cookie" = []))
)]
pub async fn delete_my_ooo(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
) -> AppResult<Json<Value>> {
    let message = state.backend.ooo().delete_status(&user.email).await?;
    Ok(Json(json!({ "message": message })))
}
