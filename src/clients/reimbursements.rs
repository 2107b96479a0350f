use reqwest::{
    multipart::{Form, Part},
    RequestBuilder,
};
use serde_json::{json, Value};
use std::time::Duration;

use super::backend::{dispatch, normalize_list, normalize_one, read_body, upstream_error, BackendClient};
use crate::{
    models::{Reimbursement, ReimbursementMutationResponse, ReimbursementRequest},
    AppError, AppResult,
};

const API: &str = "reimbursements";
const TIMEOUT: Duration = Duration::from_secs(30);

pub struct ReimbursementsApi<'a> {
    backend: &'a BackendClient,
}

impl<'a> ReimbursementsApi<'a> {
    pub(crate) fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    pub async fn create(
        &self,
        request: ReimbursementRequest,
        token: Option<&str>,
    ) -> AppResult<ReimbursementMutationResponse> {
        let url = self.backend.url(&["reimbursements"])?;
        let form = build_form(request)?;
        let builder = with_token(self.backend.http().post(url).timeout(TIMEOUT), token).multipart(form);

        let response = dispatch(API, builder).await?;
        if !response.status().is_success() {
            return Err(upstream_error(API, response, "error", "Failed to create reimbursement").await);
        }

        let body = read_body(API, response).await?;
        let reimbursement: Option<Reimbursement> = normalize_one(API, &body, "reimbursement");
        if let Some(r) = &reimbursement {
            tracing::info!(id = %r.id, amount = %r.amount, currency = %r.currency, "Reimbursement created");
        }

        Ok(ReimbursementMutationResponse {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Reimbursement created")
                .to_string(),
            reimbursement,
        })
    }

    pub async fn list(&self, token: Option<&str>) -> AppResult<Vec<Reimbursement>> {
        let url = self.backend.url(&["reimbursements"])?;
        let builder = with_token(self.backend.http().get(url).timeout(TIMEOUT), token);

        let response = dispatch(API, builder).await?;
        if !response.status().is_success() {
            return Err(upstream_error(API, response, "error", "Failed to fetch reimbursements").await);
        }

        let body = read_body(API, response).await?;
        Ok(normalize_list(API, &body, &["reimbursements"]))
    }

    /// Any status string is forwarded as is
    pub async fn update_status(&self, id: &str, status: &str, token: Option<&str>) -> AppResult<Value> {
        let url = self.backend.url(&["reimbursements", id])?;
        let builder = with_token(self.backend.http().patch(url).timeout(TIMEOUT), token)
            .json(&json!({ "status": status }));

        let response = dispatch(API, builder).await?;
        if !response.status().is_success() {
            return Err(upstream_error(API, response, "error", "Failed to update reimbursement status").await);
        }

        tracing::info!(id, status, "Reimbursement status updated");
        read_body(API, response).await
    }
}

fn with_token(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

fn build_form(request: ReimbursementRequest) -> AppResult<Form> {
    let ReimbursementRequest {
        amount,
        currency,
        description,
        invoice_date,
        user_name,
        user_email,
        user_address,
        file,
    } = request;

    let mut part = Part::bytes(file.bytes).file_name(file.file_name);
    if let Some(content_type) = file.content_type {
        part = part
            .mime_str(&content_type)
            .map_err(|e| AppError::BadRequest(format!("Invalid file content type {}: {}", content_type, e)))?;
    }

    let mut form = Form::new()
        .text("amount", amount.to_string())
        .text("currency", currency)
        .text("invoiceDate", invoice_date)
        .text("userName", user_name)
        .text("userEmail", user_email);

    if let Some(description) = description {
        form = form.text("description", description);
    }
    if let Some(address) = user_address {
        form = form.text("userAddress", address);
    }

    Ok(form.part("file", part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReceiptFile;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn request(content_type: Option<&str>) -> ReimbursementRequest {
        ReimbursementRequest {
            amount: Decimal::from_str("42.50").unwrap(),
            currency: "USD".to_string(),
            description: None,
            invoice_date: "2024-01-15".to_string(),
            user_name: "Ana".to_string(),
            user_email: "ana@blockful.io".to_string(),
            user_address: None,
            file: ReceiptFile {
                file_name: "receipt.pdf".to_string(),
                content_type: content_type.map(str::to_string),
                bytes: vec![1, 2, 3],
            },
        }
    }

    #[test]
    fn test_build_form_accepts_receipt() {
        assert!(build_form(request(Some("application/pdf"))).is_ok());
        assert!(build_form(request(None)).is_ok());
    }

    #[test]
    fn test_build_form_rejects_bad_content_type() {
        let err = build_form(request(Some("not a mime"))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
