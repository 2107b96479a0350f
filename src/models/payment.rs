use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Arbitrum One, the only chain the wallet config targets
pub const PAYOUT_CHAIN_ID: u64 = 42161;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuoteRequest {
    pub reimbursement_id: Option<String>,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub currency: Option<String>,
    pub recipient_address: Option<String>,
    /// Connected wallet balance in wei, as a decimal string
    pub balance_wei: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuote {
    pub reimbursement_id: Option<String>,
    #[schema(value_type = String)]
    pub usd_amount: Decimal,
    #[schema(value_type = String)]
    pub eth_usd_rate: Decimal,
    #[schema(value_type = String)]
    pub eth_amount: Decimal,
    /// Transaction value in wei, as a decimal string
    pub wei_value: String,
    pub to: String,
    pub to_short: String,
    pub chain_id: u64,
    pub display: String,
}
