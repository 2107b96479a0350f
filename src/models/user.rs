use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User record held by the backend
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: String,
    pub google_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

/// Partial update for `PUT /users/email/{email}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    BackendUnavailable,
    AlreadyExists,
    Created,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SyncResponse {
    pub outcome: SyncOutcome,
    pub user: Option<BackendUser>,
}
