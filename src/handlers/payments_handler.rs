use axum::{extract::State, Json};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use std::sync::Arc;

use crate::{
    models::{
        payment::{PAYOUT_CHAIN_ID, ZERO_ADDRESS},
        reimbursement::DEFAULT_CURRENCY,
        PaymentQuote, PaymentQuoteRequest,
    },
    AppError, AppResult, AppState,
};

const WEI_PER_ETH: u64 = 1_000_000_000_000_000_000;

pub fn eth_amount(usd: Decimal, rate: Decimal) -> AppResult<Decimal> {
    usd.checked_div(rate)
        .ok_or_else(|| AppError::Internal("ETH/USD rate must be positive".to_string()))
}

/// Wei for an ETH amount, truncated
pub fn wei_value(eth: Decimal) -> AppResult<u128> {
    eth.checked_mul(Decimal::from(WEI_PER_ETH))
        .and_then(|wei| wei.trunc().to_u128())
        .ok_or_else(|| AppError::Validation("Amount is too large to pay out".to_string()))
}

/// Default to the zero address when the claimant has no wallet; a given address must be `0x` plus 40 hex digits
pub fn recipient(address: Option<&str>) -> AppResult<String> {
    match address.map(str::trim).filter(|a| !a.is_empty()) {
        None => Ok(ZERO_ADDRESS.to_string()),
        Some(address) => {
            let valid = address.len() == 42
                && address.starts_with("0x")
                && address[2..].chars().all(|c| c.is_ascii_hexdigit());
            if valid {
                Ok(address.to_string())
            } else {
                Err(AppError::Validation(format!("Invalid recipient address: {}", address)))
            }
        }
    }
}

pub fn check_balance(balance_wei: Option<&str>, wei: u128) -> AppResult<()> {
    let Some(raw) = balance_wei else {
        return Ok(());
    };

    let balance: u128 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid wallet balance: {}", raw)))?;

    if balance < wei {
        return Err(AppError::Validation("Insufficient balance".to_string()));
    }

    Ok(())
}

fn short_address(address: &str) -> String {
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

pub fn quote(request: PaymentQuoteRequest, rate: Decimal) -> AppResult<PaymentQuote> {
    if request.amount <= Decimal::ZERO {
        return Err(AppError::Validation("Amount must be greater than zero".to_string()));
    }

    let currency = request.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
    if !currency.eq_ignore_ascii_case(DEFAULT_CURRENCY) {
        return Err(AppError::BadRequest(format!(
            "Only {} amounts can be paid out, got {}",
            DEFAULT_CURRENCY, currency
        )));
    }

    // Convert at the static rate, truncating to whole wei
    let to = recipient(request.recipient_address.as_deref())?;
    let eth = eth_amount(request.amount, rate)?;
    let wei = wei_value(eth)?;
    check_balance(request.balance_wei.as_deref(), wei)?;

    Ok(PaymentQuote {
        reimbursement_id: request.reimbursement_id,
        usd_amount: request.amount,
        eth_usd_rate: rate,
        display: format!("{:.6} ETH", eth),
        eth_amount: eth,
        wei_value: wei.to_string(),
        to_short: short_address(&to),
        to,
        chain_id: PAYOUT_CHAIN_ID,
    })
}

/// POST /api/payments/quote
#[utoipa::path(
    post,
    path = "/api/payments/quote",
    request_body = PaymentQuoteRequest,
    responses(
        (status = 200, description = "ETH transaction for the reimbursement", body = PaymentQuote),
        (status = 400, description = "Unsupported currency"),
        (status = 422, description = "Invalid amount, recipient or insufficient balance")
    ),
    tag = "payments"
)]
pub async fn quote_payment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PaymentQuoteRequest>,
) -> AppResult<Json<PaymentQuote>> {
    let quote = quote(request, state.config.eth_usd_rate)?;
    tracing::debug!(usd = %quote.usd_amount, wei = %quote.wei_value, to = %quote.to_short, "Payment quoted");
    Ok(Json(quote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const RECIPIENT: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn request(amount: &str) -> PaymentQuoteRequest {
        PaymentQuoteRequest {
            reimbursement_id: Some("r-1".to_string()),
            amount: dec(amount),
            currency: Some("usd".to_string()),
            recipient_address: Some(RECIPIENT.to_string()),
            balance_wei: None,
        }
    }

    #[test]
    fn test_quote_converts_at_static_rate() {
        let quote = quote(request("100"), dec("2500")).unwrap();
        assert_eq!(quote.eth_amount, dec("0.04"));
        assert_eq!(quote.wei_value, "40000000000000000");
        assert_eq!(quote.display, "0.040000 ETH");
        assert_eq!(quote.to_short, "0x5290...9EE7");
        assert_eq!(quote.chain_id, 42161);
    }

    #[test]
    fn test_wei_is_truncated() {
        // 1 / 3 ETH
        let wei = wei_value(eth_amount(dec("1"), dec("3")).unwrap()).unwrap();
        assert_eq!(wei, 333_333_333_333_333_333);
    }

    #[test]
    fn test_missing_recipient_is_zero_address() {
        let mut req = request("10");
        req.recipient_address = None;
        assert_eq!(quote(req, dec("2500")).unwrap().to, ZERO_ADDRESS);
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        assert!(recipient(Some("0x1234")).is_err());
        assert!(recipient(Some("52908400098527886E0F7030069857D2E4169EE7ab")).is_err());
        assert!(recipient(Some("0xZZ908400098527886E0F7030069857D2E4169EE7")).is_err());
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        assert!(matches!(quote(request("0"), dec("2500")), Err(AppError::Validation(_))));
        assert!(matches!(quote(request("-5"), dec("2500")), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_other_currency_is_rejected() {
        let mut req = request("10");
        req.currency = Some("EUR".to_string());
        assert!(matches!(quote(req, dec("2500")), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_insufficient_balance() {
        let mut req = request("100");
        req.balance_wei = Some("39999999999999999".to_string());
        match quote(req, dec("2500")) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Insufficient balance"),
            other => panic!("expected insufficient balance, got {:?}", other.map(|q| q.wei_value)),
        }

        assert!(check_balance(Some("40000000000000000"), 40_000_000_000_000_000).is_ok());
        assert!(check_balance(None, 1).is_ok());
        assert!(check_balance(Some("lots"), 1).is_err());
    }
}
