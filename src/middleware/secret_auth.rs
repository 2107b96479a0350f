use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::AppState;

pub const DEBUG_KEY_HEADER: &str = "X-Debug-Key";

/// Guards `/debug`. With no DEBUG_KEY configured the endpoint is closed.
pub async fn require_debug_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let expected = state.config.debug_key.as_bytes();
    if expected.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }

    let provided = request
        .headers()
        .get(DEBUG_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if expected.ct_eq(provided.as_bytes()).into() {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Rejected debug endpoint access");
        Err(StatusCode::UNAUTHORIZED)
    }
}
