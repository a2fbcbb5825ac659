//! Defines the WebSocket message protocol between the voice platform and the relay.

use callrelay_core::transcript::Utterance;
use serde::{Deserialize, Serialize};

/// Whose turn it is, as reported with transcript updates.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnTaking {
    AgentTurn,
    UserTurn,
}

/// Payload shared by `response_required` and `reminder_required`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseRequest {
    pub response_id: i64,
    #[serde(default)]
    pub transcript: Vec<Utterance>,
}

/// Messages sent from the voice platform to the relay.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "interaction_type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Call metadata, sent once after the config event asks for it.
    CallDetails {
        #[serde(default)]
        call: serde_json::Value,
    },
    /// Keep-alive; the timestamp is echoed back exactly as received.
    PingPong {
        #[serde(default)]
        timestamp: serde_json::Value,
    },
    /// Transcript update that needs no reply.
    UpdateOnly {
        #[serde(default)]
        transcript: Vec<Utterance>,
        #[serde(default)]
        turntaking: Option<TurnTaking>,
    },
    /// The caller finished speaking and expects an answer.
    ResponseRequired(ResponseRequest),
    /// The caller has been silent for a while.
    ReminderRequired(ResponseRequest),
    /// Any interaction type this relay does not know about.
    #[serde(other)]
    Unknown,
}

impl InboundEvent {
    /// Parses a text frame, also returning the raw discriminant for logging.
    pub fn parse(text: &str) -> serde_json::Result<(Self, Option<String>)> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let kind = value
            .get("interaction_type")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let event = serde_json::from_value(value)?;
        Ok((event, kind))
    }
}

/// Settings advertised to the platform when the connection opens.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub auto_reconnect: bool,
    pub call_details: bool,
}

/// One fragment of a streamed answer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResponseChunk {
    pub response_id: i64,
    pub content: String,
    pub content_complete: bool,
    pub end_call: bool,
}

impl ResponseChunk {
    pub fn partial(response_id: i64, content: impl Into<String>) -> Self {
        Self {
            response_id,
            content: content.into(),
            content_complete: false,
            end_call: false,
        }
    }

    pub fn terminal(response_id: i64, content: impl Into<String>, end_call: bool) -> Self {
        Self {
            response_id,
            content: content.into(),
            content_complete: true,
            end_call,
        }
    }
}

/// Messages sent from the relay to the voice platform.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "response_type", rename_all = "snake_case")]
pub enum OutboundEvent {
    Config {
        config: ConnectionConfig,
    },
    Response(ResponseChunk),
    AgentInterrupt {
        interrupt_id: i64,
        content: String,
        content_complete: bool,
        no_interruption_allowed: bool,
        end_call: bool,
    },
    PingPong {
        timestamp: serde_json::Value,
    },
    ToolCallInvocation {
        tool_call_id: String,
        name: String,
        arguments: String,
    },
    ToolCallResult {
        tool_call_id: String,
        content: String,
    },
}

impl OutboundEvent {
    /// The config event sent as soon as the socket opens.
    pub fn initial_config() -> Self {
        OutboundEvent::Config {
            config: ConnectionConfig {
                auto_reconnect: true,
                call_details: true,
            },
        }
    }
}
