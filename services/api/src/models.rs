//! HTTP API Models
//!
//! Request and response bodies of the REST endpoints, annotated for OpenAPI
//! generation with `utoipa`.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "Retell Groq Custom LLM Server")]
    pub message: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Retell Groq Custom LLM Server".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    #[schema(example = "Invalid signature")]
    pub error: String,
}

/// Call lifecycle notification posted by the voice platform.
#[derive(Deserialize, ToSchema, Debug, Clone, Default)]
pub struct WebhookPayload {
    #[schema(example = "call_started")]
    pub event: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub call: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
}

/// The lifecycle events the relay knows by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventKind {
    CallStarted,
    CallEnded,
    CallAnalyzed,
    Other(Option<String>),
}

impl fmt::Display for WebhookEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookEventKind::CallStarted => write!(f, "call_started"),
            WebhookEventKind::CallEnded => write!(f, "call_ended"),
            WebhookEventKind::CallAnalyzed => write!(f, "call_analyzed"),
            WebhookEventKind::Other(Some(name)) => write!(f, "{}", name),
            WebhookEventKind::Other(None) => write!(f, "<missing>"),
        }
    }
}

impl WebhookPayload {
    pub fn kind(&self) -> WebhookEventKind {
        match self.event.as_deref() {
            Some("call_started") => WebhookEventKind::CallStarted,
            Some("call_ended") => WebhookEventKind::CallEnded,
            Some("call_analyzed") => WebhookEventKind::CallAnalyzed,
            other => WebhookEventKind::Other(other.map(str::to_string)),
        }
    }

    /// The call id, read from `call` and falling back to `data`.
    pub fn call_id(&self) -> Option<&str> {
        [self.call.as_ref(), self.data.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|obj| obj.get("call_id").and_then(|id| id.as_str()))
    }
}
