use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::{
    config::{AppConfig, OAuthCredentials},
    AppError, AppResult,
};

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_SCOPE: &str = "read:user user:email read:org";

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const GOOGLE_SCOPE: &str = "openid email profile";

pub const USER_AGENT: &str = "GateFul-Portal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GitHub,
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::GitHub => "github",
            Provider::Google => "google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Provider::GitHub),
            "google" => Ok(Provider::Google),
            other => Err(AppError::NotFound(format!("Unknown sign-in provider: {}", other))),
        }
    }
}

/// Identity returned by a provider after a successful code exchange
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub provider: Provider,
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub email_verified: Option<bool>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider(&self) -> Provider;

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> AppResult<String>;

    /// Trade the authorization code for an access token
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> AppResult<String>;

    async fn fetch_profile(&self, access_token: &str) -> AppResult<ProviderProfile>;
}

/// Google accounts must be verified and belong to the company domain.
/// GitHub has no verified flag, so any account may sign in.
pub fn allow_sign_in(profile: &ProviderProfile, allowed_domain: &str) -> bool {
    match profile.provider {
        Provider::Google => {
            let suffix = format!("@{}", allowed_domain.trim_start_matches('@'));
            profile.email_verified == Some(true) && profile.email.to_ascii_lowercase().ends_with(&suffix)
        }
        Provider::GitHub => true,
    }
}

/// Resolve a configured provider, or NotFound when its credentials are missing
pub fn provider_for(
    provider: Provider,
    config: &AppConfig,
    http: &reqwest::Client,
) -> AppResult<Box<dyn IdentityProvider>> {
    let missing = || AppError::NotFound(format!("Sign-in with {} is not configured", provider));

    match provider {
        Provider::GitHub => Ok(Box::new(GitHubOAuth {
            http: http.clone(),
            credentials: config.github.clone().ok_or_else(missing)?,
            api_url: config.github_api_url.clone(),
        })),
        Provider::Google => Ok(Box::new(GoogleOAuth {
            http: http.clone(),
            credentials: config.google.clone().ok_or_else(missing)?,
        })),
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    fn into_access_token(self, provider: Provider) -> AppResult<String> {
        match self.access_token {
            Some(token) => Ok(token),
            None => {
                let reason = self
                    .error_description
                    .or(self.error)
                    .unwrap_or_else(|| "no access token returned".to_string());
                tracing::warn!(%provider, reason, "OAuth code exchange rejected");
                Err(AppError::Unauthorized(format!("Sign-in with {} failed: {}", provider, reason)))
            }
        }
    }
}

fn build_url(base: &str, params: &[(&str, &str)]) -> AppResult<String> {
    url::Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| AppError::Internal(format!("Failed to build authorize URL: {}", e)))
}

async fn read_json<T: serde::de::DeserializeOwned>(
    provider: Provider,
    response: reqwest::Response,
) -> AppResult<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(%provider, status = %status, body, "OAuth provider returned error");
        return Err(AppError::Unauthorized(format!(
            "Sign-in with {} failed: provider returned {}",
            provider, status
        )));
    }

    response.json::<T>().await.map_err(|e| {
        tracing::error!(%provider, error = %e, "Failed to parse OAuth provider response");
        AppError::Internal(format!("Failed to parse {} response: {}", provider, e))
    })
}

fn transport_error(provider: Provider, e: reqwest::Error) -> AppError {
    tracing::error!(%provider, error = %e, "OAuth provider request failed");
    AppError::Internal(format!("Failed to reach {}: {}", provider, e))
}

pub struct GitHubOAuth {
    http: reqwest::Client,
    credentials: OAuthCredentials,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct GitHubAccount {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

impl GitHubOAuth {
    /// `/user` omits private emails, so fall back to the primary verified address
    async fn primary_email(&self, access_token: &str) -> AppResult<Option<String>> {
        let response = self
            .http
            .get(format!("{}/user/emails", self.api_url))
            .bearer_auth(access_token)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| transport_error(Provider::GitHub, e))?;

        let emails: Vec<GitHubEmail> = read_json(Provider::GitHub, response).await?;

        Ok(emails
            .into_iter()
            .find(|e| e.primary && e.verified)
            .map(|e| e.email))
    }
}

#[async_trait]
impl IdentityProvider for GitHubOAuth {
    fn provider(&self) -> Provider {
        Provider::GitHub
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> AppResult<String> {
        build_url(
            GITHUB_AUTHORIZE_URL,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("scope", GITHUB_SCOPE),
                ("state", state),
            ],
        )
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> AppResult<String> {
        let response = self
            .http
            .post(GITHUB_TOKEN_URL)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| transport_error(Provider::GitHub, e))?;

        read_json::<TokenResponse>(Provider::GitHub, response)
            .await?
            .into_access_token(Provider::GitHub)
    }

    async fn fetch_profile(&self, access_token: &str) -> AppResult<ProviderProfile> {
        let response = self
            .http
            .get(format!("{}/user", self.api_url))
            .bearer_auth(access_token)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| transport_error(Provider::GitHub, e))?;

        let account: GitHubAccount = read_json(Provider::GitHub, response).await?;

        let email = match account.email {
            Some(email) => email,
            None => self.primary_email(access_token).await?.ok_or_else(|| {
                AppError::Unauthorized("GitHub account has no verified email address".to_string())
            })?,
        };

        Ok(ProviderProfile {
            provider: Provider::GitHub,
            account_id: account.id.to_string(),
            name: account.name.filter(|n| !n.is_empty()).unwrap_or(account.login),
            email,
            image: account.avatar_url,
            email_verified: None,
        })
    }
}

pub struct GoogleOAuth {
    http: reqwest::Client,
    credentials: OAuthCredentials,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    name: Option<String>,
    email: String,
    email_verified: Option<bool>,
    picture: Option<String>,
}

#[async_trait]
impl IdentityProvider for GoogleOAuth {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> AppResult<String> {
        build_url(
            GOOGLE_AUTHORIZE_URL,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", GOOGLE_SCOPE),
                ("state", state),
            ],
        )
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> AppResult<String> {
        let response = self
            .http
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| transport_error(Provider::Google, e))?;

        read_json::<TokenResponse>(Provider::Google, response)
            .await?
            .into_access_token(Provider::Google)
    }

    async fn fetch_profile(&self, access_token: &str) -> AppResult<ProviderProfile> {
        let response = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(Provider::Google, e))?;

        let info: GoogleUserInfo = read_json(Provider::Google, response).await?;

        Ok(ProviderProfile {
            provider: Provider::Google,
            account_id: info.sub,
            name: info.name.unwrap_or_else(|| info.email.clone()),
            email: info.email,
            image: info.picture,
            email_verified: info.email_verified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google(email: &str, verified: Option<bool>) -> ProviderProfile {
        ProviderProfile {
            provider: Provider::Google,
            account_id: "1".to_string(),
            name: "Ana".to_string(),
            email: email.to_string(),
            image: None,
            email_verified: verified,
        }
    }

    #[test]
    fn test_google_requires_verified_company_email() {
        assert!(allow_sign_in(&google("ana@blockful.io", Some(true)), "blockful.io"));
        assert!(!allow_sign_in(&google("ana@blockful.io", Some(false)), "blockful.io"));
        assert!(!allow_sign_in(&google("ana@blockful.io", None), "blockful.io"));
        assert!(!allow_sign_in(&google("ana@gmail.com", Some(true)), "blockful.io"));
        assert!(!allow_sign_in(&google("ana@notblockful.io", Some(true)), "blockful.io"));
    }

    #[test]
    fn test_github_is_always_allowed() {
        let mut profile = google("someone@example.com", None);
        profile.provider = Provider::GitHub;
        assert!(allow_sign_in(&profile, "blockful.io"));
    }

    #[test]
    fn test_provider_round_trips_through_str() {
        for provider in [Provider::GitHub, Provider::Google] {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
        assert!("gitlab".parse::<Provider>().is_err());
    }

    #[test]
    fn test_unconfigured_provider_is_not_found() {
        let config = AppConfig::for_tests();
        let http = reqwest::Client::new();
        assert!(matches!(
            provider_for(Provider::Google, &config, &http),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_github_authorize_url_carries_scope_and_state() {
        let mut config = AppConfig::for_tests();
        config.github = Some(OAuthCredentials {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
        });
        let http = reqwest::Client::new();
        let provider = provider_for(Provider::GitHub, &config, &http).unwrap();

        let url = provider
            .authorize_url("http://localhost:8080/api/auth/callback/github", "abc")
            .unwrap();
        let parsed = url::Url::parse(&url).unwrap();
        let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();

        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["scope"], GITHUB_SCOPE);
        assert_eq!(params["state"], "abc");
    }
}
