use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ooo::OooApi, reimbursements::ReimbursementsApi, users::UsersApi};
use crate::{AppError, AppResult};

/// Shared handle on the separately hosted backend service
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn ooo(&self) -> OooApi<'_> {
        OooApi::new(self)
    }

    pub fn reimbursements(&self) -> ReimbursementsApi<'_> {
        ReimbursementsApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Base URL joined with percent-encoded path segments
    pub(crate) fn url(&self, segments: &[&str]) -> AppResult<url::Url> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| AppError::Internal(format!("Invalid BACKEND_URL {}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| AppError::Internal(format!("BACKEND_URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

/// Send a request and log both ends. Connection failures and timeouts become BackendUnavailable.
pub(crate) async fn dispatch(api: &'static str, builder: RequestBuilder) -> AppResult<Response> {
    let (client, request) = builder.build_split();
    let request = request.map_err(|e| AppError::Internal(format!("Failed to build {} request: {}", api, e)))?;

    tracing::debug!(api, method = %request.method(), url = %request.url(), "Backend request");

    let response = client
        .execute(request)
        .await
        .map_err(|e| transport_error(api, e))?;

    tracing::debug!(api, status = %response.status(), "Backend response");
    metrics::counter!(
        "gateful_upstream_requests_total",
        "api" => api,
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    Ok(response)
}

pub(crate) fn transport_error(api: &'static str, e: reqwest::Error) -> AppError {
    if e.is_connect() || e.is_timeout() {
        tracing::warn!(api, error = %e, "Backend is not reachable");
        AppError::BackendUnavailable
    } else {
        tracing::error!(api, error = %e, "Backend request failed");
        AppError::Internal(format!("{} request failed: {}", api, e))
    }
}

/// Parse a successful response body; an empty body reads as null
pub(crate) async fn read_body(api: &'static str, response: Response) -> AppResult<Value> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(api, e))?;

    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!(api, error = %e, "Failed to parse backend response");
        AppError::Internal(format!("Failed to parse {} response: {}", api, e))
    })
}

/// Turn a non-success response into an error carrying the backend's message field, or `fallback`
pub(crate) async fn upstream_error(
    api: &'static str,
    response: Response,
    field: &str,
    fallback: &str,
) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(api, status = %status, body, "Backend returned error");

    AppError::Upstream {
        status,
        message: error_message(&body, field, fallback),
        details: None,
    }
}

pub(crate) fn error_message(body: &str, field: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get(field).and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        _ => true,
    }
}

/// First truthy `body[key]`, else the body itself
pub(crate) fn pick<'a>(body: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .find(|v| truthy(v))
        .unwrap_or(body)
}

/// Normalize a list response. Anything that is not an array yields an empty list;
/// records that do not parse are skipped.
pub(crate) fn normalize_list<T: DeserializeOwned>(api: &'static str, body: &Value, keys: &[&str]) -> Vec<T> {
    let Some(items) = pick(body, keys).as_array() else {
        tracing::warn!(api, "Backend list response was not an array");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(api, error = %e, "Skipping malformed backend record");
                None
            }
        })
        .collect()
}

/// Normalize a single-record response (`body[key] || body || null`)
pub(crate) fn normalize_one<T: DeserializeOwned>(api: &'static str, body: &Value, key: &str) -> Option<T> {
    let value = pick(body, &[key]);
    if !truthy(value) {
        return None;
    }

    match serde_json::from_value::<T>(value.clone()) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(api, error = %e, "Backend record did not match the expected shape");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_pick_prefers_first_truthy_key() {
        let body = json!({"ooo": null, "oooStatuses": [{"id": 1}]});
        assert_eq!(pick(&body, &["ooo", "oooStatuses"]), &json!([{"id": 1}]));
    }

    #[test]
    fn test_pick_falls_back_to_body() {
        let body = json!([{"id": 1}]);
        assert_eq!(pick(&body, &["ooo"]), &body);
    }

    #[test]
    fn test_normalize_list_from_wrapped_and_bare_bodies() {
        let wrapped: Vec<Item> = normalize_list("test", &json!({"reimbursements": [{"id": 1}, {"id": 2}]}), &["reimbursements"]);
        let bare: Vec<Item> = normalize_list("test", &json!([{"id": 3}]), &["reimbursements"]);
        assert_eq!(wrapped, vec![Item { id: 1 }, Item { id: 2 }]);
        assert_eq!(bare, vec![Item { id: 3 }]);
    }

    #[test]
    fn test_normalize_list_non_array_is_empty() {
        let items: Vec<Item> = normalize_list("test", &json!({"message": "nothing here"}), &["ooo"]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_normalize_list_skips_malformed_records() {
        let items: Vec<Item> = normalize_list("test", &json!([{"id": 1}, {"id": "x"}]), &[]);
        assert_eq!(items, vec![Item { id: 1 }]);
    }

    #[test]
    fn test_normalize_one() {
        assert_eq!(normalize_one::<Item>("test", &json!({"ooo": {"id": 9}}), "ooo"), Some(Item { id: 9 }));
        assert_eq!(normalize_one::<Item>("test", &json!({"id": 4}), "ooo"), Some(Item { id: 4 }));
        assert_eq!(normalize_one::<Item>("test", &Value::Null, "ooo"), None);
        assert_eq!(normalize_one::<Item>("test", &json!({"ooo": null}), "ooo"), None);
    }

    #[test]
    fn test_error_message_uses_field_or_fallback() {
        assert_eq!(error_message(r#"{"error":"Email is required"}"#, "error", "Failed"), "Email is required");
        assert_eq!(error_message(r#"{"message":"nope"}"#, "error", "Failed"), "Failed");
        assert_eq!(error_message("<html>", "error", "Failed"), "Failed");
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = BackendClient::new(Client::new(), "http://localhost:4000");
        let url = client.url(&["ooo", "ana+ooo@blockful.io"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/ooo/ana+ooo@blockful.io");

        let url = client.url(&["users", "email", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/users/email/a%20b%2Fc");
    }
}
