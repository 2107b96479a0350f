use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use super::reimbursement::DEFAULT_CURRENCY;
use crate::AppError;

/// Receipt attached to a reimbursement request
#[derive(Debug, Clone)]
pub struct ReceiptFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Multipart fields accepted by `POST /api/reimbursements`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct CreateReimbursementForm {
    pub amount: String,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub invoice_date: String,
    pub user_address: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Validated reimbursement ready for the backend
#[derive(Debug, Clone)]
pub struct ReimbursementRequest {
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
    pub invoice_date: String,
    pub user_name: String,
    pub user_email: String,
    pub user_address: Option<String>,
    pub file: ReceiptFile,
}

/// Collects multipart text fields before validation
#[derive(Debug, Default)]
pub struct ReimbursementDraft {
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub invoice_date: Option<String>,
    pub user_address: Option<String>,
    pub file: Option<ReceiptFile>,
}

impl ReimbursementDraft {
    pub fn set_text(&mut self, name: &str, value: String) {
        let value = Some(value).filter(|v| !v.trim().is_empty());
        match name {
            "amount" => self.amount = value,
            "currency" => self.currency = value,
            "description" => self.description = value,
            "invoiceDate" => self.invoice_date = value,
            "userAddress" => self.user_address = value,
            other => tracing::debug!(field = other, "Ignoring unknown reimbursement field"),
        }
    }

    pub fn into_request(
        self,
        user_name: String,
        user_email: String,
    ) -> Result<ReimbursementRequest, AppError> {
        let raw_amount = self
            .amount
            .ok_or_else(|| AppError::Validation("Amount is required".to_string()))?;

        let amount = Decimal::from_str(raw_amount.trim())
            .map_err(|_| AppError::Validation(format!("Invalid amount: {}", raw_amount)))?;

        if amount <= Decimal::ZERO {
            return Err(AppError::Validation("Amount must be greater than zero".to_string()));
        }

        let invoice_date = self
            .invoice_date
            .ok_or_else(|| AppError::Validation("Invoice date is required".to_string()))?;

        let file = self
            .file
            .filter(|f| !f.bytes.is_empty())
            .ok_or_else(|| AppError::Validation("Receipt file is required".to_string()))?;

        Ok(ReimbursementRequest {
            amount,
            currency: self
                .currency
                .map(|c| c.trim().to_ascii_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            description: self.description,
            invoice_date,
            user_name,
            user_email,
            user_address: self.user_address,
            file,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusInput {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ReimbursementDraft {
        let mut draft = ReimbursementDraft::default();
        draft.set_text("amount", "120.75".to_string());
        draft.set_text("invoiceDate", "2024-01-12".to_string());
        draft.set_text("description", "".to_string());
        draft.file = Some(ReceiptFile {
            file_name: "receipt.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: vec![1, 2, 3],
        });
        draft
    }

    #[test]
    fn test_defaults_currency_and_drops_empty_fields() {
        let request = draft()
            .into_request("Ana".to_string(), "ana@blockful.io".to_string())
            .unwrap();
        assert_eq!(request.currency, "USD");
        assert!(request.description.is_none());
        assert_eq!(request.amount, Decimal::from_str("120.75").unwrap());
    }

    #[test]
    fn test_missing_amount_is_rejected() {
        let mut draft = draft();
        draft.amount = None;
        let err = draft
            .into_request("Ana".to_string(), "ana@blockful.io".to_string())
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Amount is required"));
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        let mut draft = draft();
        draft.set_text("amount", "0".to_string());
        assert!(draft
            .into_request("Ana".to_string(), "ana@blockful.io".to_string())
            .is_err());
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let mut draft = draft();
        draft.file = None;
        assert!(draft
            .into_request("Ana".to_string(), "ana@blockful.io".to_string())
            .is_err());
    }
}
