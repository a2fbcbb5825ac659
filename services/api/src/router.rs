//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application:
//! the health check, the lifecycle webhook and the LLM WebSocket endpoint.

use crate::{
    handlers,
    models::{ErrorResponse, HealthResponse, WebhookAck, WebhookPayload},
    state::AppState,
    ws::ws_handler,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::health_check, handlers::webhook),
    components(schemas(HealthResponse, WebhookAck, WebhookPayload, ErrorResponse)),
    tags(
        (name = "Call Relay", description = "Voice-call platform to LLM streaming relay")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/webhook", post(handlers::webhook))
        .route("/llm-websocket/{call_id}", get(ws_handler))
        .with_state(app_state)
}
