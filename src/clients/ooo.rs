use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

use super::backend::{dispatch, normalize_list, normalize_one, read_body, upstream_error, BackendClient};
use crate::{
    models::{OooMutationResponse, OooRequest, OooStatus},
    AppResult,
};

const API: &str = "ooo";
const TIMEOUT: Duration = Duration::from_secs(30);

pub struct OooApi<'a> {
    backend: &'a BackendClient,
}

impl<'a> OooApi<'a> {
    pub(crate) fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// Create or replace the user's OOO record
    pub async fn update_status(&self, request: &OooRequest) -> AppResult<OooMutationResponse> {
        let url = self.backend.url(&["ooo"])?;
        let response = dispatch(
            API,
            self.backend.http().post(url).timeout(TIMEOUT).json(request),
        )
        .await?;

        if !response.status().is_success() {
            return Err(upstream_error(API, response, "error", "Failed to update OOO status").await);
        }

        let body = read_body(API, response).await?;
        Ok(OooMutationResponse {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("OOO status updated")
                .to_string(),
            ooo: normalize_one(API, &body, "ooo"),
        })
    }

    /// The user's current record; a 404 means they never set one
    pub async fn get_status(&self, email: &str) -> AppResult<Option<OooStatus>> {
        let url = self.backend.url(&["ooo", email])?;
        let response = dispatch(API, self.backend.http().get(url).timeout(TIMEOUT)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(upstream_error(API, response, "error", "Failed to fetch OOO status").await);
        }

        let body = read_body(API, response).await?;
        Ok(normalize_one(API, &body, "ooo"))
    }

    pub async fn get_all(&self) -> AppResult<Vec<OooStatus>> {
        let url = self.backend.url(&["ooo"])?;
        let response = dispatch(API, self.backend.http().get(url).timeout(TIMEOUT)).await?;

        if !response.status().is_success() {
            return Err(upstream_error(API, response, "error", "Failed to fetch OOO statuses").await);
        }

        let body = read_body(API, response).await?;
        Ok(normalize_list(API, &body, &["ooo", "oooStatuses"]))
    }

    pub async fn delete_status(&self, email: &str) -> AppResult<String> {
        let url = self.backend.url(&["ooo", email])?;
        let response = dispatch(API, self.backend.http().delete(url).timeout(TIMEOUT)).await?;

        if !response.status().is_success() {
            return Err(upstream_error(API, response, "error", "Failed to delete OOO status").await);
        }

        let body = read_body(API, response).await?;
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("OOO status deleted")
            .to_string();

        tracing::info!(email, "OOO status deleted");
        Ok(message)
    }
}
