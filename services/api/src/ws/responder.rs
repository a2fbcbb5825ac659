//! Drafts streamed answers for one call.
//!
//! A [`ResponseDrafter`] is created when a WebSocket opens and dropped when it
//! closes. For every request it yields zero or more partial `response` events
//! followed by exactly one terminal event.

use super::protocol::{OutboundEvent, ResponseChunk, ResponseRequest};
use crate::{config::FailurePolicy, state::AppState};
use async_stream::stream;
use callrelay_core::{
    llm_client::{LLMClient, LLMStreamEvent},
    persona::Persona,
    prompt::{Trigger, build_messages},
};
use futures_util::{Stream, StreamExt};
use std::sync::Arc;
use tracing::{debug, error};

/// The response id used for the agent's opening line.
pub const BEGIN_RESPONSE_ID: i64 = 0;

/// Per-connection completion client.
pub struct ResponseDrafter {
    llm_client: Arc<dyn LLMClient>,
    persona: Arc<Persona>,
    transcript_window: Option<usize>,
    failure_policy: FailurePolicy,
}

impl ResponseDrafter {
    pub fn new(
        llm_client: Arc<dyn LLMClient>,
        persona: Arc<Persona>,
        transcript_window: Option<usize>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            llm_client,
            persona,
            transcript_window,
            failure_policy,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.llm_client.clone(),
            state.persona.clone(),
            state.config.transcript_window,
            state.config.failure_policy,
        )
    }

    /// The fixed opening line, sent when call details arrive.
    pub fn begin_message(&self) -> OutboundEvent {
        OutboundEvent::Response(ResponseChunk::terminal(
            BEGIN_RESPONSE_ID,
            self.persona.greeting.clone(),
            false,
        ))
    }

    /// Streams the answer to `request`.
    ///
    /// Upstream failures never escape: they end the stream with a single
    /// apology event.
    pub fn draft_response(
        &self,
        request: ResponseRequest,
        trigger: Trigger,
    ) -> impl Stream<Item = OutboundEvent> + Send + 'static {
        let llm_client = self.llm_client.clone();
        let persona = self.persona.clone();
        let window = self.transcript_window;
        let end_call_on_failure = self.failure_policy == FailurePolicy::EndCall;

        stream! {
            let response_id = request.response_id;
            let apology = || {
                OutboundEvent::Response(ResponseChunk::terminal(
                    response_id,
                    persona.apology.clone(),
                    end_call_on_failure,
                ))
            };

            let upstream = match build_messages(&persona, &request.transcript, trigger, window) {
                Ok(messages) => {
                    debug!(
                        response_id,
                        messages = messages.len(),
                        ?trigger,
                        "Requesting completion"
                    );
                    llm_client.stream_chat(messages).await
                }
                Err(e) => Err(e.into()),
            };

            let mut upstream = match upstream {
                Ok(upstream) => upstream,
                Err(e) => {
                    error!(response_id, error = ?e, "Failed to start completion stream");
                    yield apology();
                    return;
                }
            };

            let mut fragments = 0usize;
            while let Some(item) = upstream.next().await {
                match item {
                    Ok(LLMStreamEvent::TextChunk(text)) => {
                        fragments += 1;
                        yield OutboundEvent::Response(ResponseChunk::partial(response_id, text));
                    }
                    Err(e) => {
                        error!(response_id, fragments, error = ?e, "Completion stream failed");
                        yield apology();
                        return;
                    }
                }
            }

            debug!(response_id, fragments, "Completion finished");
            yield OutboundEvent::Response(ResponseChunk::terminal(response_id, "", false));
        }
    }
}
