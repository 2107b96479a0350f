use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_CURRENCY: &str = "USD";

pub const REIMBURSEMENT_CATEGORIES: [&str; 6] = [
    "Food",
    "Transportation",
    "Accommodation",
    "Office Supplies",
    "Training",
    "Others",
];

/// Expense claim as stored by the backend. `status` is a free string.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reimbursement {
    pub id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_address: Option<String>,
    #[schema(value_type = String)]
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub description: Option<String>,
    pub invoice_date: String,
    pub status: String,
    pub file_name: Option<String>,
    pub created_at: Option<String>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReimbursementMutationResponse {
    pub message: String,
    pub reimbursement: Option<Reimbursement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReimbursementStatusUpdate {
    pub id: String,
    pub status: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub message: String,
    pub data: ReimbursementStatusUpdate,
}
