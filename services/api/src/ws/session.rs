//! Manages the WebSocket connection lifecycle for one call.

use super::{
    protocol::{InboundEvent, OutboundEvent, ResponseRequest},
    responder::ResponseDrafter,
};
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use callrelay_core::prompt::Trigger;
use futures_util::{Sink, SinkExt, StreamExt, stream::SplitStream};
use std::{pin::pin, sync::Arc};
use tracing::{debug, error, info, instrument, warn};

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(call_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, call_id, state))
}

/// Main handler for an individual WebSocket connection.
///
/// The response drafter lives exactly as long as this function.
#[instrument(name = "llm_ws", skip_all, fields(call_id = %call_id))]
async fn handle_socket(socket: WebSocket, call_id: String, state: Arc<AppState>) {
    info!("WebSocket connected");

    let (mut socket_tx, socket_rx) = socket.split();
    let drafter = ResponseDrafter::from_state(&state);

    if let Err(e) = run_session(&mut socket_tx, socket_rx, &drafter).await {
        error!(error = ?e, "WebSocket session terminated with error.");
    }
    info!("WebSocket session finished.");
}

/// Reads frames until the peer goes away, handling one event at a time.
async fn run_session<S>(
    socket_tx: &mut S,
    mut socket_rx: SplitStream<WebSocket>,
    drafter: &ResponseDrafter,
) -> Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    send_msg(socket_tx, OutboundEvent::initial_config())
        .await
        .context("Failed to send config event")?;

    while let Some(msg_result) = socket_rx.next().await {
        match msg_result {
            Ok(Message::Text(text)) => match InboundEvent::parse(text.as_str()) {
                Ok((event, kind)) => handle_event(socket_tx, drafter, event, kind).await?,
                Err(e) => warn!(error = %e, "Dropping malformed frame"),
            },
            Ok(Message::Binary(data)) => {
                warn!(bytes = data.len(), "Ignoring unexpected binary frame");
            }
            Ok(Message::Close(frame)) => {
                info!(?frame, "Peer closed the connection.");
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Err(e) => {
                error!("Error receiving from WebSocket: {:?}", e);
                break;
            }
        }
    }
    Ok(())
}

/// Dispatches one inbound event.
pub(crate) async fn handle_event<S>(
    socket_tx: &mut S,
    drafter: &ResponseDrafter,
    event: InboundEvent,
    kind: Option<String>,
) -> Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    match event {
        InboundEvent::CallDetails { call } => {
            info!(
                remote_call_id = ?call.get("call_id"),
                "Call details received, sending opening line"
            );
            send_msg(socket_tx, drafter.begin_message()).await?;
        }
        InboundEvent::PingPong { timestamp } => {
            send_msg(socket_tx, OutboundEvent::PingPong { timestamp }).await?;
        }
        InboundEvent::UpdateOnly {
            transcript,
            turntaking,
        } => {
            debug!(turns = transcript.len(), ?turntaking, "Transcript update");
        }
        InboundEvent::ResponseRequired(request) => {
            stream_response(socket_tx, drafter, request, Trigger::Response).await?;
        }
        InboundEvent::ReminderRequired(request) => {
            stream_response(socket_tx, drafter, request, Trigger::Reminder).await?;
        }
        InboundEvent::Unknown => {
            warn!(interaction_type = ?kind, "Ignoring unknown interaction type");
        }
    }
    Ok(())
}

/// Forwards every event of one drafted answer before returning.
async fn stream_response<S>(
    socket_tx: &mut S,
    drafter: &ResponseDrafter,
    request: ResponseRequest,
    trigger: Trigger,
) -> Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let response_id = request.response_id;
    let mut events = pin!(drafter.draft_response(request, trigger));
    while let Some(event) = events.next().await {
        send_msg(socket_tx, event)
            .await
            .with_context(|| format!("Failed to forward response {}", response_id))?;
    }
    Ok(())
}

/// A helper function to serialize and send an `OutboundEvent` to the platform.
pub(crate) async fn send_msg<S>(socket_tx: &mut S, msg: OutboundEvent) -> Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailurePolicy;
    use async_openai::{error::OpenAIError, types::ChatCompletionRequestMessage};
    use async_trait::async_trait;
    use callrelay_core::{
        llm_client::{LLMClient, LLMStream, LLMStreamEvent},
        persona::Persona,
    };
    use futures::{channel::mpsc, stream};

    struct ScriptedLlm(Vec<&'static str>);

    #[async_trait]
    impl LLMClient for ScriptedLlm {
        async fn stream_chat(
            &self,
            _messages: Vec<ChatCompletionRequestMessage>,
        ) -> Result<LLMStream> {
            let items: Vec<Result<LLMStreamEvent, OpenAIError>> = self
                .0
                .iter()
                .map(|text| Ok(LLMStreamEvent::TextChunk(text.to_string())))
                .collect();
            Ok(Box::pin(stream::iter(items)))
        }
    }

    fn drafter(script: Vec<&'static str>) -> ResponseDrafter {
        ResponseDrafter::new(
            Arc::new(ScriptedLlm(script)),
            Arc::new(Persona::default()),
            None,
            FailurePolicy::Apologize,
        )
    }

    async fn dispatch(drafter: &ResponseDrafter, frame: &str) -> Vec<serde_json::Value> {
        let (mut tx, rx) = mpsc::unbounded::<Message>();
        let (event, kind) = InboundEvent::parse(frame).unwrap();
        handle_event(&mut tx, drafter, event, kind).await.unwrap();
        drop(tx);

        rx.map(|msg| match msg {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("unexpected frame: {:?}", other),
        })
        .collect()
        .await
    }

    #[tokio::test]
    async fn test_ping_pong_is_echoed() {
        let sent = dispatch(
            &drafter(vec![]),
            r#"{"interaction_type": "ping_pong", "timestamp": 1703302407333}"#,
        )
        .await;

        assert_eq!(
            sent,
            vec![serde_json::json!({
                "response_type": "ping_pong",
                "timestamp": 1703302407333i64
            })]
        );
    }

    #[tokio::test]
    async fn test_fractional_ping_timestamp_is_echoed_unchanged() {
        let (mut tx, rx) = mpsc::unbounded::<Message>();
        let frame = r#"{"interaction_type": "ping_pong", "timestamp": 1703302407333.25}"#;
        let (event, kind) = InboundEvent::parse(frame).unwrap();
        handle_event(&mut tx, &drafter(vec![]), event, kind)
            .await
            .unwrap();
        drop(tx);

        let frames: Vec<Message> = rx.collect().await;
        match frames.as_slice() {
            [Message::Text(text)] => assert_eq!(
                text.as_str(),
                r#"{"response_type":"ping_pong","timestamp":1703302407333.25}"#
            ),
            other => panic!("unexpected frames: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_call_details_sends_greeting() {
        let sent = dispatch(
            &drafter(vec![]),
            r#"{"interaction_type": "call_details", "call": {"call_id": "abc"}}"#,
        )
        .await;

        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["response_type"], "response");
        assert_eq!(sent[0]["response_id"], 0);
        assert_eq!(sent[0]["content"], Persona::default().greeting);
        assert_eq!(sent[0]["content_complete"], true);
        assert_eq!(sent[0]["end_call"], false);
    }

    #[tokio::test]
    async fn test_update_only_and_unknown_send_nothing() {
        let drafter = drafter(vec!["unused"]);

        let update = dispatch(
            &drafter,
            r#"{
                "interaction_type": "update_only",
                "transcript": [{"role": "user", "content": "hm"}]
            }"#,
        )
        .await;
        let unknown = dispatch(&drafter, r#"{"interaction_type": "something_new"}"#).await;

        assert!(update.is_empty());
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_response_required_streams_fragments() {
        let sent = dispatch(
            &drafter(vec!["Sure", ", what's your zip?"]),
            r#"{"interaction_type": "response_required", "response_id": 4, "transcript": []}"#,
        )
        .await;

        let complete: Vec<bool> = sent
            .iter()
            .map(|v| v["content_complete"].as_bool().unwrap())
            .collect();
        assert_eq!(complete, vec![false, false, true]);
        assert!(sent.iter().all(|v| v["response_id"] == 4));
        assert_eq!(sent[2]["content"], "");
    }
}
