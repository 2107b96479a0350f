use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::{self, oauth_state::STATE_COOKIE, Provider},
    extractors::{session_from_headers, SessionUser, SESSION_COOKIE},
    models::Role,
    AppError, AppResult, AppState,
};

const ACCESS_DENIED: &str = "/login?error=AccessDenied";
const CALLBACK_FAILED: &str = "/login?error=OAuthCallback";

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SignInQuery {
    /// Same-site path to land on after sign-in
    pub callback_url: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: SessionUserView,
    pub role: Role,
    /// Session expiry, RFC 3339
    pub expires: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionUserView {
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub provider: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RoleQuery {
    pub role: Option<String>,
}

/// Role echoed back to the role provider on session load
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleEcho {
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SwitchRoleRequest {
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    pub role: Role,
    /// Dashboard to navigate to; absent when the role did not change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

fn redirect_uri(state: &AppState, provider: Provider) -> String {
    format!("{}{}/{}", state.config.public_url, CALLBACK_PATH, provider)
}

const CALLBACK_PATH: &str = "/api/auth/callback";

fn state_cookie(state: &AppState, nonce: String) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, nonce))
        .path(CALLBACK_PATH)
        .http_only(true)
        .secure(state.config.public_url.starts_with("https://"))
        .same_site(SameSite::Lax)
        .build()
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.config.public_url.starts_with("https://"))
        .same_site(SameSite::Lax)
        .build()
}

/// GET /api/auth/signin/{provider}
#[utoipa::path(
    get,
    path = "/api/auth/signin/{provider}",
    params(
        ("provider" = String, Path, description = "github or google"),
        SignInQuery
    ),
    responses(
        (status = 303, description = "Redirect to the provider's consent screen, with the state nonce cookie set"),
        (status = 404, description = "Unknown or unconfigured provider")
    ),
    tag = "auth"
)]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(query): Query<SignInQuery>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    let provider: Provider = provider.parse()?;
    let identity = auth::provider_for(provider, &state.config, &state.http)?;

    let callback = auth::sanitize_callback(query.callback_url.as_deref());
    let (oauth_state, nonce) =
        auth::generate_state(provider, &callback, &state.config.session_secret)?;
    let url = identity.authorize_url(&redirect_uri(&state, provider), &oauth_state)?;

    tracing::debug!(provider = %identity.provider(), callback, "Starting sign-in");
    Ok((jar.add(state_cookie(&state, nonce)), Redirect::to(&url)))
}

/// GET /api/auth/callback/{provider}
#[utoipa::path(
    get,
    path = "/api/auth/callback/{provider}",
    params(
        ("provider" = String, Path, description = "github or google"),
        CallbackQuery
    ),
    responses(
        (status = 303, description = "Session cookie set, redirect to the callback URL or the login page on failure"),
        (status = 401, description = "Invalid or expired state, or state issued to another browser")
    ),
    tag = "auth"
)]
pub async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> AppResult<Response> {
    let provider: Provider = provider.parse()?;

    // The nonce cookie is single-use
    let cookie_nonce = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build(STATE_COOKIE).path(CALLBACK_PATH));

    if let Some(error) = query.error {
        tracing::warn!(%provider, error, "Provider returned an error");
        return Ok((jar, Redirect::to(ACCESS_DENIED)).into_response());
    }

    let (code, raw_state) = match (query.code, query.state) {
        (Some(code), Some(raw_state)) => (code, raw_state),
        _ => return Err(AppError::BadRequest("Missing code or state".to_string())),
    };

    // Check state signature, expiry, provider and browser
    let oauth_state = auth::validate_state(&raw_state, &state.config.session_secret)?;
    if oauth_state.provider != provider {
        return Err(AppError::Unauthorized("State was issued for another provider".to_string()));
    }
    if !oauth_state.issued_to(cookie_nonce.as_deref()) {
        tracing::warn!(%provider, "Sign-in state does not belong to this browser");
        return Err(AppError::Unauthorized("Sign-in state does not match this browser".to_string()));
    }

    // Exchange the code for a profile
    let identity = auth::provider_for(provider, &state.config, &state.http)?;
    let profile = match identity
        .exchange_code(&code, &redirect_uri(&state, provider))
        .await
    {
        Ok(access_token) => identity.fetch_profile(&access_token).await,
        Err(e) => Err(e),
    };

    let profile = match profile {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(%provider, error = %e, "OAuth callback failed");
            return Ok((jar, Redirect::to(CALLBACK_FAILED)).into_response());
        }
    };

    if !auth::allow_sign_in(&profile, &state.config.allowed_email_domain) {
        tracing::warn!(%provider, email = %profile.email, "Sign-in rejected");
        return Ok((jar, Redirect::to(ACCESS_DENIED)).into_response());
    }

    // New sessions always start as employee
    let (token, claims) = auth::issue_session(
        &profile,
        &state.config.session_secret,
        state.config.session_ttl_hours,
    )?;
    state.roles.reset(&claims.sid).await;

    tracing::info!(%provider, email = %claims.email, "User signed in");

    // Sync in the background so a slow backend never blocks sign-in
    let backend = state.backend.clone();
    let user = SessionUser::from(claims);
    tokio::spawn(async move {
        if let Err(e) = backend.users().sync_session_user(&user).await {
            tracing::error!(email = %user.email, error = %e, "User sync failed");
        }
    });

    let jar = jar.add(session_cookie(&state, token));
    Ok((jar, Redirect::to(&oauth_state.callback_url)).into_response())
}

/// GET /api/auth/session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Not signed in")
    ),
    tag = "auth",
    security(("session_cookie" = []))
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<SessionResponse>> {
    let claims = session_from_headers(&headers, &state.config.session_secret)
        .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))?;

    let role = state.roles.current(&claims.sid).await;
    let expires = chrono::DateTime::from_timestamp(claims.exp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default();

    Ok(Json(SessionResponse {
        user: SessionUserView {
            name: claims.name,
            email: claims.email,
            image: claims.picture,
            provider: claims.provider,
        },
        role,
        expires,
    }))
}

/// POST /api/auth/signout
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    responses(
        (status = 303, description = "Session cookie cleared, redirect to the login page")
    ),
    tag = "auth"
)]
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(claims) = session_from_headers(&headers, &state.config.session_secret) {
        state.roles.clear(&claims.sid).await;
        tracing::info!(email = %claims.email, "User signed out");
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/login"))
}

/// GET /api/auth/role
#[utoipa::path(
    get,
    path = "/api/auth/role",
    params(RoleQuery),
    responses(
        (status = 200, description = "Requested role, or employee", body = RoleEcho),
        (status = 401, description = "Not signed in")
    ),
    tag = "auth"
)]
pub async fn get_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RoleQuery>,
) -> Response {
    if session_from_headers(&headers, &state.config.session_secret).is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "role": null }))).into_response();
    }

    // Echoed as-is; the active role lives in the role store
    let role = query
        .role
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| Role::Employee.to_string());

    Json(RoleEcho { role }).into_response()
}

/// POST /api/auth/role
#[utoipa::path(
    post,
    path = "/api/auth/role",
    request_body = SwitchRoleRequest,
    responses(
        (status = 200, description = "Role switched", body = RoleResponse),
        (status = 401, description = "Not signed in")
    ),
    tag = "auth",
    security(("session_cookie" = []))
)]
pub async fn switch_role(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Json(payload): Json<SwitchRoleRequest>,
) -> Json<RoleResponse> {
    let redirect = state.roles.switch(&user.session_id, payload.role).await;

    Json(RoleResponse {
        role: payload.role,
        redirect: redirect.map(str::to_string),
    })
}
