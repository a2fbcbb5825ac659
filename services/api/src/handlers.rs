//! Axum Handlers for the REST API
//!
//! The health check and the call lifecycle webhook. Both are documented with
//! `utoipa` path annotations.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    models::{ErrorResponse, HealthResponse, WebhookAck, WebhookEventKind, WebhookPayload},
    signature::{self, SIGNATURE_HEADER},
    state::AppState,
};

pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
            }
            ApiError::Unauthorized(error) => {
                (StatusCode::UNAUTHORIZED, Json(ErrorResponse { error })).into_response()
            }
        }
    }
}

/// Report that the service is up.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Receive a call lifecycle notification.
#[utoipa::path(
    post,
    path = "/webhook",
    request_body = WebhookPayload,
    responses(
        (status = 200, description = "Event received", body = WebhookAck),
        (status = 400, description = "Body is not valid JSON", body = ErrorResponse),
        (status = 401, description = "Signature verification failed", body = ErrorResponse)
    ),
    params(
        ("x-retell-signature" = Option<String>, Header, description = "Signature of the raw body, `v=<millis>,d=<hex>`")
    )
)]
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let provided_signature = headers.get(SIGNATURE_HEADER).map(|v| v.to_str());

    if let (Some(api_key), Some(provided)) =
        (state.config.webhook_api_key.as_deref(), provided_signature)
    {
        let verified = provided
            .map_err(|_| signature::SignatureError::Malformed)
            .and_then(|sig| signature::verify(&body, api_key, sig));
        if let Err(e) = verified {
            error!(error = %e, "Invalid webhook signature");
            return Err(ApiError::Unauthorized("Invalid signature".to_string()));
        }
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejecting webhook with malformed body");
        ApiError::BadRequest(format!("Invalid JSON body: {}", e))
    })?;

    let call_id = payload.call_id();
    match payload.kind() {
        WebhookEventKind::CallStarted => info!(call_id, "Call started"),
        WebhookEventKind::CallEnded => info!(call_id, "Call ended"),
        WebhookEventKind::CallAnalyzed => info!(call_id, "Call analyzed"),
        other => info!(event = %other, call_id, "Unknown webhook event"),
    }

    Ok(Json(WebhookAck { received: true }))
}
