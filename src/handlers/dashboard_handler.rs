use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

use crate::{
    extractors::SessionUser,
    models::{role_redirect, Dashboard},
    AppState,
};

/// GET /, /admin, /employee and their sub-pages.
/// Sends the user to the dashboard of their active role, or describes it.
#[utoipa::path(
    get,
    path = "/{dashboard}",
    params(("dashboard" = String, Path, description = "admin or employee")),
    responses(
        (status = 200, description = "Dashboard for the active role", body = Dashboard),
        (status = 303, description = "Path belongs to another role"),
        (status = 307, description = "Not signed in")
    ),
    tag = "dashboard",
    security(("session_cookie" = []))
)]
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    uri: Uri,
) -> Response {
    let role = state.roles.current(&user.session_id).await;

    // Wrong dashboard for the active role
    match role_redirect(uri.path(), role) {
        Some(target) => Redirect::to(target).into_response(),
        None => Json(Dashboard::for_role(role)).into_response(),
    }
}
