// src/main.rs
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod app;
mod candidates;
mod common;
mod jobs;
mod logging_middleware;
mod matching;
mod services;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::config::print_config_status;
use common::{AppConfig, AppState};
use services::embedding::{load_embedder, Embedder};
use services::{GroqClient, LlmEvaluator};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env();
    print_config_status(&config);

    // ========================================================================
    // DIRECTORY SETUP
    // ========================================================================

    tokio::fs::create_dir_all(&config.data_dir).await?;
    tokio::fs::create_dir_all(&config.resumes_dir).await?;

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            if let Some(parent) = std::path::Path::new(path_without_params).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    // Run database migrations
    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let embedder_config = config.clone();
    let embedder: Arc<dyn Embedder> =
        Arc::from(tokio::task::spawn_blocking(move || load_embedder(&embedder_config)).await??);
    info!(
        model = %embedder.model_name(),
        dimension = embedder.dimension(),
        "Embedder loaded"
    );

    if config.llm.api_key.is_none() {
        warn!("GROQ_API_KEY is not set; evaluation endpoints will return 503");
    }
    let chat = GroqClient::new(config.llm.clone())?;
    let evaluator = Arc::new(LlmEvaluator::new(Arc::new(chat)));
    info!(model = %evaluator.model_name(), "LLM evaluator initialized");

    // ========================================================================
    // APPLICATION STATE AND ROUTER
    // ========================================================================

    let port = config.port;
    let state = Arc::new(AppState::new(pool, config, embedder, evaluator));
    let app = app::build_router(state);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
