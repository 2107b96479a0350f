use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Path, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::{
    extractors::{auth::session_token, SessionUser},
    models::{
        CreateReimbursementForm, ReceiptFile, Reimbursement, ReimbursementDraft,
        ReimbursementMutationResponse, ReimbursementStatusUpdate, StatusUpdateResponse,
        UpdateStatusInput,
    },
    AppError, AppResult, AppState,
};

/// GET /api/reimbursements
#[utoipa::path(
    get,
    path = "/api/reimbursements",
    responses(
        (status = 200, description = "Reimbursement requests", body = Vec<Reimbursement>),
        (status = 503, description = "Backend unavailable")
    ),
    tag = "reimbursements",
    security(("session_cookie" = []))
)]
pub async fn list_reimbursements(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    headers: HeaderMap,
) -> AppResult<Json<Vec<Reimbursement>>> {
    let token = session_token(&headers, &state.config.session_secret);
    let reimbursements = state.backend.reimbursements().list(token.as_deref()).await?;
    Ok(Json(reimbursements))
}

/// POST /api/reimbursements
#[utoipa::path(
    post,
    path = "/api/reimbursements",
    request_body(content = CreateReimbursementForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Reimbursement submitted", body = ReimbursementMutationResponse),
        (status = 413, description = "Receipt exceeds the upload limit"),
        (status = 422, description = "Validation failed")
    ),
    tag = "reimbursements",
    security(("session_cookie" = []))
)]
pub async fn create_reimbursement(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> AppResult<Json<ReimbursementMutationResponse>> {
    // Collect text fields and the receipt
    let mut draft = ReimbursementDraft::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "file" {
            draft.file = Some(read_file(field).await?);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| multipart_error(&format!("Invalid field {}", name), e))?;
            draft.set_text(&name, value);
        }
    }

    // Validate before touching the backend
    let request = draft.into_request(user.name, user.email)?;
    let token = session_token(&headers, &state.config.session_secret);
    let response = state
        .backend
        .reimbursements()
        .create(request, token.as_deref())
        .await?;

    Ok(Json(response))
}

async fn read_file(field: Field<'_>) -> AppResult<ReceiptFile> {
    let file_name = field.file_name().unwrap_or("receipt").to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| multipart_error("Failed to read receipt", e))?;

    Ok(ReceiptFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}

// Oversized bodies surface from the multipart stream, not from the extractor
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge("Receipt exceeds the upload limit".to_string());
    }
    AppError::BadRequest(format!("{}: {}", context, e.body_text()))
}

/// PATCH /api/reimbursements/{id}
#[utoipa::path(
    patch,
    path = "/api/reimbursements/{id}",
    params(("id" = String, Path, description = "Reimbursement id")),
    request_body = UpdateStatusInput,
    responses(
        (status = 200, description = "Status updated", body = StatusUpdateResponse),
        (status = 422, description = "Missing status")
    ),
    tag = "reimbursements",
    security(("session_cookie" = []))
)]
pub async fn update_reimbursement_status(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<StatusUpdateResponse>> {
    let status = input.status.trim();
    if status.is_empty() {
        return Err(AppError::Validation("Status is required".to_string()));
    }

    let token = session_token(&headers, &state.config.session_secret);
    state
        .backend
        .reimbursements()
        .update_status(&id, status, token.as_deref())
        .await?;

    tracing::info!(id, status, by = %user.email, "Reimbursement status changed");

    Ok(Json(StatusUpdateResponse {
        success: true,
        message: "Status updated successfully".to_string(),
        data: ReimbursementStatusUpdate {
            id,
            status: status.to_string(),
            updated_at: chrono::Utc::now().to_rfc3339(),
        },
    }))
}
