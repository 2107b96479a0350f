use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ooo::parse_day;
use crate::AppError;

/// OOO form submitted by the signed-in user
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertOooInput {
    pub active: bool,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    pub emergency_contact: Option<String>,
}

impl UpsertOooInput {
    pub fn validate(&self) -> Result<(), AppError> {
        // Required fields
        if self.start_date.trim().is_empty() {
            return Err(AppError::Validation("Start date is required".to_string()));
        }
        if self.end_date.trim().is_empty() {
            return Err(AppError::Validation("End date is required".to_string()));
        }
        if self.reason.trim().is_empty() {
            return Err(AppError::Validation("Reason is required".to_string()));
        }
        if self.message.trim().chars().count() < 10 {
            return Err(AppError::Validation(
                "Message must have at least 10 characters".to_string(),
            ));
        }

        // Date order
        let start = parse_day(&self.start_date)
            .ok_or_else(|| AppError::Validation(format!("Invalid start date: {}", self.start_date)))?;
        let end = parse_day(&self.end_date)
            .ok_or_else(|| AppError::Validation(format!("Invalid end date: {}", self.end_date)))?;

        if end < start {
            return Err(AppError::Validation(
                "End date cannot be before start date".to_string(),
            ));
        }

        Ok(())
    }

    /// Attach the session identity to build the backend payload
    pub fn into_request(self, user_name: String, user_email: String) -> OooRequest {
        OooRequest {
            active: self.active,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
            message: self.message,
            emergency_contact: self.emergency_contact.filter(|c| !c.trim().is_empty()),
            user_name,
            user_email,
        }
    }
}

/// Payload for `POST /ooo` on the backend. `emergencyContact` is always sent, as `null` when absent.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OooRequest {
    pub active: bool,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
    pub message: String,
    pub emergency_contact: Option<String>,
    pub user_name: String,
    pub user_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> UpsertOooInput {
        UpsertOooInput {
            active: true,
            start_date: "2024-02-01".to_string(),
            end_date: "2024-02-05".to_string(),
            reason: "Vacation".to_string(),
            message: "Travelling with family".to_string(),
            emergency_contact: Some("".to_string()),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_empty_required_fields_are_rejected() {
        let mut missing_start = input();
        missing_start.start_date = "".to_string();
        assert!(matches!(missing_start.validate(), Err(AppError::Validation(m)) if m == "Start date is required"));

        let mut missing_reason = input();
        missing_reason.reason = "  ".to_string();
        assert!(matches!(missing_reason.validate(), Err(AppError::Validation(m)) if m == "Reason is required"));
    }

    #[test]
    fn test_short_message_is_rejected() {
        let mut short = input();
        short.message = "brb".to_string();
        assert!(short.validate().is_err());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let mut reversed = input();
        reversed.end_date = "2024-01-31".to_string();
        assert!(reversed.validate().is_err());
    }

    #[test]
    fn test_request_sends_null_emergency_contact() {
        let request = input().into_request("Ana".to_string(), "ana@blockful.io".to_string());
        let body = serde_json::to_value(&request).unwrap();
        assert!(body["emergencyContact"].is_null());
        assert_eq!(body["userEmail"], "ana@blockful.io");
    }
}
