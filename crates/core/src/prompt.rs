//! Prompt construction.
//!
//! Turns the transcript supplied by the voice platform into the chat message
//! list sent upstream: the persona instruction first, then one message per
//! utterance in call order, then an optional re-engagement nudge.

use crate::{
    persona::Persona,
    transcript::{Speaker, Utterance},
};
use async_openai::{
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    },
};

/// Why a reply is being drafted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The caller finished speaking and expects an answer.
    Response,
    /// The caller has been silent and should be re-engaged.
    Reminder,
}

/// Maps transcript turns onto chat roles, preserving order.
pub fn transcript_to_messages(
    transcript: &[Utterance],
) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
    transcript
        .iter()
        .map(|utterance| -> Result<ChatCompletionRequestMessage, OpenAIError> {
            Ok(match utterance.speaker {
                Speaker::Agent => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(utterance.content.clone())
                    .build()?
                    .into(),
                Speaker::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(utterance.content.clone())
                    .build()?
                    .into(),
            })
        })
        .collect()
}

/// Builds the full message list for one completion request.
///
/// With `window` set, only the most recent `window` transcript messages are
/// kept; the system instruction and the reminder nudge are never dropped.
pub fn build_messages(
    persona: &Persona,
    transcript: &[Utterance],
    trigger: Trigger,
    window: Option<usize>,
) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
    let recent = match window {
        Some(window) => &transcript[transcript.len().saturating_sub(window)..],
        None => transcript,
    };

    let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(recent.len() + 2);
    messages.push(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(persona.system_prompt.clone())
            .build()?
            .into(),
    );
    messages.extend(transcript_to_messages(recent)?);

    if trigger == Trigger::Reminder {
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(persona.reminder_nudge.clone())
                .build()?
                .into(),
        );
    }

    Ok(messages)
}
