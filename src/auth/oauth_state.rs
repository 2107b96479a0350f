use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::providers::Provider;
use crate::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Sign-in attempts must come back from the provider within 10 minutes
pub const STATE_TTL_SECS: i64 = 10 * 60;

/// Holds the state nonce in the browser that started sign-in
pub const STATE_COOKIE: &str = "gateful.oauth-state";

/// Where a completed sign-in lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthState {
    pub provider: Provider,
    pub callback_url: String,
    pub nonce: String,
}

impl OAuthState {
    /// The callback must arrive in the browser holding the nonce cookie
    pub fn issued_to(&self, cookie_nonce: Option<&str>) -> bool {
        match cookie_nonce {
            Some(nonce) => bool::from(nonce.as_bytes().ct_eq(self.nonce.as_bytes())),
            None => false,
        }
    }
}

/// Generate the OAuth `state` parameter and its nonce.
/// Token format: base64url(provider:expiry:nonce:base64url(callback):hmac_signature)
pub fn generate_state(
    provider: Provider,
    callback_url: &str,
    secret: &str,
) -> Result<(String, String), AppError> {
    let expiry_time = chrono::Utc::now().timestamp() + STATE_TTL_SECS;

    let mut nonce = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut nonce);

    let nonce = hex::encode(nonce);
    let payload = format!(
        "{}:{}:{}:{}",
        provider.as_str(),
        expiry_time,
        nonce,
        URL_SAFE_NO_PAD.encode(sanitize_callback(Some(callback_url)).as_bytes()),
    );

    let signature = create_hmac_signature(&payload, secret)?;

    let token = URL_SAFE_NO_PAD.encode(format!("{}:{}", payload, signature).as_bytes());
    Ok((token, nonce))
}

/// Validate a returned `state` and recover the provider and callback URL
pub fn validate_state(token: &str, secret: &str) -> Result<OAuthState, AppError> {
    let decoded_bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| AppError::Unauthorized("Invalid sign-in state".to_string()))?;

    let decoded = String::from_utf8(decoded_bytes)
        .map_err(|_| AppError::Unauthorized("Invalid sign-in state encoding".to_string()))?;

    let parts: Vec<&str> = decoded.split(':').collect();
    let [provider, expiry, nonce, callback, token_signature] = parts.as_slice() else {
        return Err(AppError::Unauthorized("Invalid sign-in state structure".to_string()));
    };

    let payload = format!("{}:{}:{}:{}", provider, expiry, nonce, callback);
    let expected_signature = create_hmac_signature(&payload, secret)?;

    if !bool::from(expected_signature.as_bytes().ct_eq(token_signature.as_bytes())) {
        return Err(AppError::Unauthorized("Invalid sign-in state".to_string()));
    }

    let expiry_time: i64 = expiry
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid sign-in state expiry".to_string()))?;

    if chrono::Utc::now().timestamp() > expiry_time {
        return Err(AppError::BadRequest(
            "Sign-in attempt has expired. Please start over.".to_string(),
        ));
    }

    let provider: Provider = provider
        .parse()
        .map_err(|_| AppError::Unauthorized("Unknown provider in sign-in state".to_string()))?;

    let callback_bytes = URL_SAFE_NO_PAD
        .decode(callback)
        .map_err(|_| AppError::Unauthorized("Invalid callback in sign-in state".to_string()))?;
    let callback_url = String::from_utf8(callback_bytes)
        .map_err(|_| AppError::Unauthorized("Invalid callback in sign-in state".to_string()))?;

    Ok(OAuthState {
        provider,
        callback_url: sanitize_callback(Some(&callback_url)),
        nonce: nonce.to_string(),
    })
}

/// Only same-site absolute paths are allowed as post-login destinations
pub fn sanitize_callback(callback_url: Option<&str>) -> String {
    match callback_url.map(str::trim) {
        Some(url) if url.starts_with('/') && !url.starts_with("//") && !url.contains('\\') => {
            url.to_string()
        }
        _ => "/".to_string(),
    }
}

fn create_hmac_signature(data: &str, secret: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(format!("HMAC initialization error: {}", e)))?;

    mac.update(data.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    #[test]
    fn test_generate_and_validate_state() {
        let (token, nonce) = generate_state(Provider::Google, "/admin/ooo?tab=all", SECRET).unwrap();
        let state = validate_state(&token, SECRET).unwrap();

        assert_eq!(state.provider, Provider::Google);
        assert_eq!(state.callback_url, "/admin/ooo?tab=all");
        assert_eq!(state.nonce, nonce);
    }

    #[test]
    fn test_state_is_bound_to_issuing_browser() {
        let (token, nonce) = generate_state(Provider::GitHub, "/", SECRET).unwrap();
        let state = validate_state(&token, SECRET).unwrap();

        assert!(state.issued_to(Some(&nonce)));
        assert!(!state.issued_to(Some("0123456789abcdef0123456789abcdef")));
        assert!(!state.issued_to(None));
    }

    #[test]
    fn test_state_with_wrong_signature() {
        let (token, _) = generate_state(Provider::GitHub, "/", SECRET).unwrap();
        assert!(validate_state(&token, "wrong_secret_key").is_err());
    }

    #[test]
    fn test_invalid_state_format() {
        assert!(validate_state("invalid_state", SECRET).is_err());
    }

    #[test]
    fn test_sanitize_callback_blocks_offsite_redirects() {
        assert_eq!(sanitize_callback(Some("/employee")), "/employee");
        assert_eq!(sanitize_callback(Some("https://evil.example")), "/");
        assert_eq!(sanitize_callback(Some("//evil.example")), "/");
        assert_eq!(sanitize_callback(None), "/");
    }
}
