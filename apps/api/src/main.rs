mod analysis;
mod archive;
mod config;
mod db;
mod errors;
mod exports;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod routes;
mod session;
mod sources;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::extractor::LlmSkillExtractor;
use crate::analysis::skills_map::SkillsMap;
use crate::config::Config;
use crate::db::create_pool;
use crate::exports::spawn_export_sweeper;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JD match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis (match sessions)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let skills_map = SkillsMap::load(&config.skills_map_path);
    info!("Skills map loaded ({} entries)", skills_map.len());

    // Data directories: archive, skills map and transient exports live here
    config.ensure_data_dirs()?;
    info!("Data directory: {}", config.data_dir.display());

    // Stale exports are swept periodically
    spawn_export_sweeper(
        config.export_dir.clone(),
        config.export_max_age(),
        Duration::from_secs(config.export_sweep_interval_secs.max(1)),
    );

    // Build app state
    let state = AppState {
        db,
        sessions: SessionStore::new(redis),
        http: reqwest::Client::new(),
        extractor: Arc::new(LlmSkillExtractor(llm)),
        skills_map: Arc::new(skills_map),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
