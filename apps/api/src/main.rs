mod auth;
mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::token::JwtKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::jobs::store::PgJobStore;
use crate::llm_client::LlmClient;
use crate::resume::static_analyzer::StaticAnalyzer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ApplyTrack API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let jwt = JwtKeys::new(config.jwt_secret.as_bytes());
    let analyzer = StaticAnalyzer::default();

    // Build app state
    let state = AppState {
        jobs: Arc::new(PgJobStore::new(db.clone())),
        db,
        llm: Arc::new(llm),
        jwt,
        analyzer: Arc::new(analyzer),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
