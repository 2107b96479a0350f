use axum::{extract::State, Extension, Json};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;

use crate::{middleware::RequestId, AppState};

#[derive(Serialize)]
pub struct DebugInfo {
    pub version: String,
    pub git_sha: String,
    pub environment: String,
    pub uptime_seconds: u64,
    pub backend_url: String,
    pub backend_status: String,
    pub github_token_configured: bool,
    pub providers: Vec<&'static str>,
    pub request_id: String,
    pub timestamp: u64,
}

pub static START_TIME: Lazy<SystemTime> = Lazy::new(SystemTime::now);

pub async fn debug_handler(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> Json<DebugInfo> {
    let backend_status = if state.backend.users().test_connection().await {
        "reachable"
    } else {
        "unreachable"
    };

    let mut providers = Vec::new();
    if state.config.github.is_some() {
        providers.push("github");
    }
    if state.config.google.is_some() {
        providers.push("google");
    }

    Json(DebugInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_sha: option_env!("GIT_SHA").unwrap_or("unknown").to_string(),
        environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        uptime_seconds: START_TIME.elapsed().unwrap_or_default().as_secs(),
        backend_url: state.config.backend_url.clone(),
        backend_status: backend_status.to_string(),
        github_token_configured: state.config.github_token.is_some(),
        providers,
        request_id: request_id.0,
        timestamp: SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
    })
}
