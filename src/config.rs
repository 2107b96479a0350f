use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

const DEFAULT_MAX_UPLOAD_MB: usize = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub public_url: String,
    pub frontend_origin: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub backend_url: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub github: Option<OAuthCredentials>,
    pub google: Option<OAuthCredentials>,
    pub allowed_email_domain: String,
    pub eth_usd_rate: Decimal,
    pub debug_key: String,
    pub max_upload_bytes: usize, // Receipt uploads
}

#[derive(Clone, Debug)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let session_secret = env::var("SESSION_SECRET")
            .or_else(|_| env::var("NEXTAUTH_SECRET"))
            .map_err(|_| "SESSION_SECRET must be set".to_string())?;

        if session_secret.len() < 16 {
            return Err("SESSION_SECRET must be at least 16 characters".to_string());
        }

        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .map(|v| {
                v.parse::<i64>()
                    .map_err(|_| format!("SESSION_TTL_HOURS is not a number: {}", v))
            })
            .transpose()?
            .unwrap_or(24);

        let eth_usd_rate = match env::var("ETH_USD_RATE") {
            Ok(raw) => parse_rate(&raw)?,
            Err(_) => Decimal::from(2500),
        };

        let max_upload_mb = env::var("MAX_UPLOAD_MB")
            .ok()
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|_| format!("MAX_UPLOAD_MB is not a number: {}", v))
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        Ok(Self {
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:8080"),
            public_url: trim_url(var_or("PUBLIC_URL", "http://localhost:8080")),
            frontend_origin: var_or("FRONTEND_ORIGIN", "http://localhost:3000"),
            session_secret,
            session_ttl_hours,
            backend_url: trim_url(var_or("BACKEND_URL", "http://localhost:4000")),
            github_api_url: trim_url(var_or("GITHUB_API_URL", "https://api.github.com")),
            github_token: non_empty("GITHUB_TOKEN"),
            github: credentials("AUTH_GITHUB_ID", "AUTH_GITHUB_SECRET"),
            google: credentials("AUTH_GOOGLE_ID", "AUTH_GOOGLE_SECRET"),
            allowed_email_domain: var_or("ALLOWED_EMAIL_DOMAIN", "blockful.io"),
            eth_usd_rate,
            debug_key: var_or("DEBUG_KEY", ""),
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    non_empty(key).unwrap_or_else(|| default.to_string())
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn credentials(id_key: &str, secret_key: &str) -> Option<OAuthCredentials> {
    Some(OAuthCredentials {
        client_id: non_empty(id_key)?,
        client_secret: non_empty(secret_key)?,
    })
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_rate(raw: &str) -> Result<Decimal, String> {
    let rate = Decimal::from_str(raw.trim())
        .map_err(|_| format!("ETH_USD_RATE is not a decimal: {}", raw))?;

    if rate <= Decimal::ZERO {
        return Err("ETH_USD_RATE must be positive".to_string());
    }

    Ok(rate)
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            public_url: "http://localhost:8080".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
            session_secret: "test_session_secret_for_gateful".to_string(),
            session_ttl_hours: 24,
            backend_url: "http://127.0.0.1:9".to_string(),
            github_api_url: "http://127.0.0.1:9".to_string(),
            github_token: None,
            github: None,
            google: None,
            allowed_email_domain: "blockful.io".to_string(),
            eth_usd_rate: Decimal::from(2500),
            debug_key: "debug".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}
