use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;

use crate::{
    auth::{self, SessionClaims},
    AppState,
};

pub const SESSION_COOKIE: &str = "gateful.session-token";

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    let value = jar.get(SESSION_COOKIE)?.value_trimmed().to_string();
    Some(value).filter(|v| !v.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    Some(token.to_string()).filter(|t| !t.is_empty())
}

/// Session token candidates: the session cookie (browser) first, then the Authorization header (API clients)
pub fn candidate_tokens(headers: &HeaderMap) -> Vec<String> {
    cookie_token(headers)
        .into_iter()
        .chain(bearer_token(headers))
        .collect()
}

/// The first candidate token that validates, with its claims
pub fn validated_session(headers: &HeaderMap, secret: &str) -> Option<(String, SessionClaims)> {
    candidate_tokens(headers)
        .into_iter()
        .find_map(|token| match auth::validate_session(&token, secret) {
            Ok(claims) => Some((token, claims)),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session token");
                None
            }
        })
}

/// Validated session claims, or None when no token is present or none validates
pub fn session_from_headers(headers: &HeaderMap, secret: &str) -> Option<SessionClaims> {
    validated_session(headers, secret).map(|(_, claims)| claims)
}

/// The validated session token, forwarded to the backend as a bearer
pub fn session_token(headers: &HeaderMap, secret: &str) -> Option<String> {
    validated_session(headers, secret).map(|(token, _)| token)
}

#[derive(Debug, Clone)]
pub struct SessionUser {
    pub session_id: String,
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    pub provider: String,
}

impl From<SessionClaims> for SessionUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            session_id: claims.sid,
            account_id: claims.sub,
            name: claims.name,
            email: claims.email,
            picture: claims.picture,
            provider: claims.provider,
        }
    }
}

impl FromRequestParts<Arc<AppState>> for SessionUser {
    type Rejection = (StatusCode, axum::Json<serde_json::Value>);

    fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let has_token = !candidate_tokens(&parts.headers).is_empty();
        let session = validated_session(&parts.headers, &state.config.session_secret);

        async move {
            if !has_token {
                return Err((
                    StatusCode::UNAUTHORIZED,
                    axum::Json(json!({"error": "Missing authentication: no session cookie or Authorization header"})),
                ));
            }

            let (_, claims) = session.ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(json!({"error": "User session not found. Please log in again."})),
                )
            })?;

            Ok(SessionUser::from(claims))
        }
    }
}
