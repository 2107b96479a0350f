mod auth;
mod clients;
mod config;
mod error;
mod extractors;
mod handlers;
mod middleware;
mod models;
mod openapi;
mod startup;

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use handlers::MetricsState;

use clients::{BackendClient, GitHubClient};
use extractors::RoleStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub http: reqwest::Client, // OAuth provider calls
    pub backend: BackendClient,
    pub github: GitHubClient,
    pub roles: RoleStore,
    pub metrics: Arc<MetricsState>,
}

impl AppState {
    pub fn new(config: AppConfig, metrics: Arc<MetricsState>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        let session_ttl = Duration::from_secs(config.session_ttl_hours.max(1) as u64 * 3600);

        Ok(Self {
            backend: BackendClient::new(http.clone(), config.backend_url.clone()),
            github: GitHubClient::new(
                http.clone(),
                config.github_api_url.clone(),
                config.github_token.clone(),
            ),
            roles: RoleStore::new(session_ttl),
            http,
            config,
            metrics,
        })
    }
}

#[cfg(test)]
impl AppState {
    pub fn for_tests() -> Self {
        Self::for_tests_with(AppConfig::for_tests())
    }

    pub fn for_tests_with(config: AppConfig) -> Self {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .build_recorder()
            .handle();

        Self::new(config, Arc::new(MetricsState { handle })).expect("test http client")
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // JSON logs in production, human-readable otherwise
    let use_json = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()) == "json";

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,gateful=debug,tower_http=debug".into());

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        e
    })?;

    let metrics = Arc::new(handlers::setup_metrics_recorder()?);
    tracing::info!("Metrics recorder initialized");

    if config.github_token.is_none() {
        tracing::warn!("GITHUB_TOKEN not set, GitHub member endpoints will return 401");
    }
    if config.github.is_none() && config.google.is_none() {
        tracing::warn!("No OAuth provider configured, sign-in is disabled");
    }

    let bind_addr = config.bind_addr.clone();
    tracing::info!(backend = %config.backend_url, eth_usd_rate = %config.eth_usd_rate, "Configuration loaded");

    let state = Arc::new(AppState::new(config, metrics)?);
    once_cell::sync::Lazy::force(&handlers::debug::START_TIME);

    let app = startup::build_router(state)?;

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
