//! Main Entrypoint for the Call Relay Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Building the upstream LLM client and the shared persona.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use callrelay_api::{config::Config, router::create_router, state::AppState};
use callrelay_core::{
    llm_client::{LLMClient, OpenAICompatibleClient},
    persona::Persona,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    let env_filter = EnvFilter::try_new(&config.log_filter).context("Invalid RUST_LOG")?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Shared Services ---
    let openai_config = OpenAIConfig::new()
        .with_api_key(&config.groq_api_key)
        .with_api_base(&config.llm_base_url);
    let llm_client: Arc<dyn LLMClient> = Arc::new(OpenAICompatibleClient::new(
        openai_config,
        config.chat_model.clone(),
    ));

    if config.webhook_api_key.is_none() {
        warn!("RETELL_API_KEY is not set; webhook signatures will not be verified.");
    }

    let app_state = Arc::new(AppState {
        llm_client,
        persona: Arc::new(Persona::default()),
        config: Arc::new(config.clone()),
    });

    // --- 4. Create Router and Apply Middleware ---
    let app = create_router(app_state).layer(TraceLayer::new_for_http());

    // --- 5. Start Server ---
    info!(
        model = %config.chat_model,
        llm_base_url = %config.llm_base_url,
        bind_address = %config.bind_address,
        failure_policy = ?config.failure_policy,
        transcript_window = ?config.transcript_window,
        "Service configured. Starting server..."
    );
    info!(
        "WebSocket endpoint: ws://localhost:{}/llm-websocket/{{call_id}}",
        config.bind_address.port()
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
