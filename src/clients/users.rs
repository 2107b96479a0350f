use reqwest::StatusCode;
use std::time::Duration;

use super::backend::{dispatch, normalize_one, read_body, upstream_error, BackendClient};
use crate::{
    extractors::SessionUser,
    models::{
        BackendUser, CreateUserRequest, CreatedUser, SyncOutcome, SyncResponse,
        UpdateUserInput,
    },
    AppError, AppResult,
};

const API: &str = "users";
const TIMEOUT: Duration = Duration::from_secs(10);
const CHECK_EMAIL: &str = "test-connection@example.com";

pub struct UsersApi<'a> {
    backend: &'a BackendClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// Reachability check. A 404 for the check address still proves the backend is up.
    pub async fn test_connection(&self) -> bool {
        let url = match self.backend.url(&["users", "email", CHECK_EMAIL]) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(error = %e, "Cannot build backend check URL");
                return false;
            }
        };

        match dispatch(API, self.backend.http().get(url).timeout(TIMEOUT)).await {
            Ok(response) => {
                response.status().is_success() || response.status() == StatusCode::NOT_FOUND
            }
            Err(e) => {
                tracing::debug!(error = %e, "Backend reachability check failed");
                false
            }
        }
    }

    /// Any 2xx means the user was created; the echoed record is optional
    pub async fn create_user(&self, request: &CreateUserRequest) -> AppResult<Option<CreatedUser>> {
        let url = self.backend.url(&["users"])?;
        let response = dispatch(API, self.backend.http().post(url).timeout(TIMEOUT).json(request)).await?;

        if !response.status().is_success() {
            return Err(upstream_error(API, response, "message", "Failed to create user").await);
        }

        let body = read_body(API, response).await?;
        Ok(normalize_one(API, &body, "user"))
    }

    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<BackendUser>> {
        let url = self.backend.url(&["users", "email", email])?;
        let response = dispatch(API, self.backend.http().get(url).timeout(TIMEOUT)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(upstream_error(API, response, "message", "Failed to fetch user").await);
        }

        let body = read_body(API, response).await?;
        Ok(normalize_one(API, &body, "user"))
    }

    pub async fn update_user(&self, email: &str, input: &UpdateUserInput) -> AppResult<BackendUser> {
        let url = self.backend.url(&["users", "email", email])?;
        let response = dispatch(API, self.backend.http().put(url).timeout(TIMEOUT).json(input)).await?;

        if !response.status().is_success() {
            return Err(upstream_error(API, response, "message", "Failed to update user").await);
        }

        let body = read_body(API, response).await?;
        normalize_one(API, &body, "user")
            .ok_or_else(|| AppError::Internal("Unexpected update user response".to_string()))
    }

    /// Make sure the signed-in user exists on the backend. An unreachable backend is not an error.
    pub async fn sync_session_user(&self, user: &SessionUser) -> AppResult<SyncResponse> {
        if !self.test_connection().await {
            tracing::warn!(email = %user.email, "Backend not reachable, skipping user sync");
            return Ok(SyncResponse {
                outcome: SyncOutcome::BackendUnavailable,
                user: None,
            });
        }

        // Look up first
        if let Some(existing) = self.get_user_by_email(&user.email).await? {
            tracing::debug!(email = %user.email, "User already exists on backend");
            return Ok(SyncResponse {
                outcome: SyncOutcome::AlreadyExists,
                user: Some(existing),
            });
        }

        // Not found, create it
        let request = create_request(user);
        match self.create_user(&request).await? {
            Some(created) => tracing::info!(email = %created.email, id = %created.id, "User created on backend"),
            None => tracing::info!(email = %request.email, "User created on backend"),
        }

        Ok(SyncResponse {
            outcome: SyncOutcome::Created,
            user: Some(BackendUser {
                name: request.name,
                email: request.email,
                image: request.image,
                google_id: request.google_id,
            }),
        })
    }
}

fn create_request(user: &SessionUser) -> CreateUserRequest {
    CreateUserRequest {
        name: user.name.clone(),
        email: user.email.clone(),
        image: user.picture.clone().unwrap_or_default(),
        google_id: (user.provider == "google").then(|| user.account_id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(provider: &str) -> SessionUser {
        SessionUser {
            session_id: "sid".to_string(),
            account_id: "1234".to_string(),
            name: "Ana".to_string(),
            email: "ana@blockful.io".to_string(),
            picture: None,
            provider: provider.to_string(),
        }
    }

    #[test]
    fn test_create_request_google_id_only_for_google() {
        assert_eq!(create_request(&user("google")).google_id.as_deref(), Some("1234"));
        assert_eq!(create_request(&user("github")).google_id, None);
        assert_eq!(create_request(&user("github")).image, "");
    }

    /// Backend stub that knows no users and acknowledges creation without echoing the record
    async fn spawn_backend() -> String {
        use axum::{http::StatusCode, routing::{get, post}, Json, Router};

        let app = Router::new()
            .route("/users/email/{email}", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/users",
                post(|| async { (StatusCode::CREATED, Json(serde_json::json!({ "success": true }))) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_sync_creates_user_when_backend_omits_record() {
        let backend = BackendClient::new(reqwest::Client::new(), spawn_backend().await);
        let outcome = backend.users().sync_session_user(&user("google")).await.unwrap();

        assert_eq!(outcome.outcome, SyncOutcome::Created);
        assert_eq!(outcome.user.unwrap().email, "ana@blockful.io");
    }

    #[tokio::test]
    async fn test_sync_skips_when_backend_unreachable() {
        let backend = BackendClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let outcome = backend.users().sync_session_user(&user("google")).await.unwrap();
        assert_eq!(outcome.outcome, SyncOutcome::BackendUnavailable);
        assert!(outcome.user.is_none());
    }
}
