//! Main Entrypoint for the Bookline Voice Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing the language model client, inventory source, and session store.
//! 3. Starting the idle-session sweeper.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use bookline_api::{config::Config, router::create_router, state::AppState};
use bookline_core::{
    inventory::CsvInventory,
    llm_client::OpenAICompatibleClient,
    session::{InMemorySessionStore, spawn_sweeper},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 2. Initialize Shared Services ---
    let openai_config = OpenAIConfig::new()
        .with_api_key(&config.llm_api_key)
        .with_api_base(&config.llm_base_url);
    let llm_client = Arc::new(
        OpenAICompatibleClient::new(openai_config, config.chat_model.clone(), config.llm_timeout)
            .context("Failed to build language model client")?,
    );
    let inventory = Arc::new(CsvInventory::new(config.inventory_path.clone()));
    let sessions = Arc::new(InMemorySessionStore::new(config.session_ttl));

    // --- 3. Start Background Tasks ---
    let sweeper = spawn_sweeper(sessions.clone(), config.session_sweep_interval);

    let app_state = Arc::new(AppState::new(sessions, inventory, llm_client));

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        model = %config.chat_model,
        llm_base_url = %config.llm_base_url,
        inventory_path = %config.inventory_path.display(),
        session_ttl_secs = config.session_ttl.as_secs(),
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Server has shut down.");
    Ok(())
}
