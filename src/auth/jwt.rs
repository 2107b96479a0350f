use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::{claims::SessionClaims, providers::ProviderProfile};
use crate::{models::Role, AppError};

/// Sign a fresh session for a provider profile. Every new session starts as employee.
pub fn issue_session(
    profile: &ProviderProfile,
    secret: &str,
    ttl_hours: i64,
) -> Result<(String, SessionClaims), AppError> {
    let now = chrono::Utc::now().timestamp();

    let claims = SessionClaims {
        sub: profile.account_id.clone(),
        sid: Uuid::new_v4().to_string(),
        name: profile.name.clone(),
        email: profile.email.clone(),
        picture: profile.image.clone(),
        provider: profile.provider.as_str().to_string(),
        role: Role::Employee,
        iat: now,
        exp: now + ttl_hours * 3600,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign session: {}", e)))?;

    Ok((token, claims))
}

pub fn validate_session(token: &str, secret: &str) -> Result<SessionClaims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation.validate_exp = true;

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| format!("Session validation failed: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::providers::Provider;

    const SECRET: &str = "test_session_secret_for_gateful";

    fn profile() -> ProviderProfile {
        ProviderProfile {
            provider: Provider::GitHub,
            account_id: "583231".to_string(),
            name: "Ana".to_string(),
            email: "ana@blockful.io".to_string(),
            image: None,
            email_verified: None,
        }
    }

    #[test]
    fn test_issue_and_validate_session() {
        let (token, issued) = issue_session(&profile(), SECRET, 1).unwrap();
        let claims = validate_session(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "583231");
        assert_eq!(claims.sid, issued.sid);
        assert_eq!(claims.role, Role::Employee);
        assert_eq!(claims.provider, "github");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let (token, _) = issue_session(&profile(), SECRET, 1).unwrap();
        assert!(validate_session(&token, "another_secret_value_entirely").is_err());
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let (token, _) = issue_session(&profile(), SECRET, -2).unwrap();
        assert!(validate_session(&token, SECRET).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(validate_session("not-a-jwt", SECRET).is_err());
    }
}
