use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;

use crate::{extractors::session_from_headers, AppState};

/// Characters `encodeURIComponent` leaves alone
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Page paths that need a signed-in user: exactly `/`, and anything under `/employee` or `/admin`
pub fn is_protected_path(path: &str) -> bool {
    path == "/" || path.starts_with("/employee") || path.starts_with("/admin")
}

pub fn login_redirect(path: &str) -> String {
    format!("/login?callbackUrl={}", utf8_percent_encode(path, COMPONENT))
}

/// Sends unauthenticated visitors of protected pages to the login page (307)
pub async fn session_gate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if is_protected_path(path)
        && session_from_headers(request.headers(), &state.config.session_secret).is_none()
    {
        tracing::debug!(path, "No session, redirecting to login");
        return Redirect::temporary(&login_redirect(path)).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_paths() {
        assert!(is_protected_path("/"));
        assert!(is_protected_path("/admin"));
        assert!(is_protected_path("/admin/reimbursements"));
        assert!(is_protected_path("/employee/ooo"));
        assert!(is_protected_path("/employees"));
    }

    #[test]
    fn test_public_paths() {
        assert!(!is_protected_path("/login"));
        assert!(!is_protected_path("/api/ooo"));
        assert!(!is_protected_path("/health"));
        assert!(!is_protected_path(""));
    }

    #[test]
    fn test_login_redirect_encodes_path() {
        assert_eq!(login_redirect("/"), "/login?callbackUrl=%2F");
        assert_eq!(
            login_redirect("/admin/reimbursements"),
            "/login?callbackUrl=%2Fadmin%2Freimbursements"
        );
    }

    #[test]
    fn test_login_redirect_matches_uri_component_encoding() {
        assert_eq!(
            login_redirect("/employee/notes~draft(1)!"),
            "/login?callbackUrl=%2Femployee%2Fnotes~draft(1)!"
        );
        assert_eq!(login_redirect("/admin/a b"), "/login?callbackUrl=%2Fadmin%2Fa%20b");
    }
}
