#![allow(dead_code)]

use async_openai::{error::OpenAIError, types::ChatCompletionRequestMessage};
use async_trait::async_trait;
use callrelay_api::{
    config::{Config, FailurePolicy},
    state::AppState,
};
use callrelay_core::{
    llm_client::{DEFAULT_CHAT_MODEL, GROQ_API_BASE, LLMClient, LLMStream, LLMStreamEvent},
    persona::Persona,
};
use futures::stream;
use mockall::mock;
use std::{
    io,
    net::{Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
};
use tracing::Level;

mock! {
    pub Llm {}

    #[async_trait]
    impl LLMClient for Llm {
        async fn stream_chat(
            &self,
            messages: Vec<ChatCompletionRequestMessage>,
        ) -> anyhow::Result<LLMStream>;
    }
}

/// A minimal configuration suitable for tests.
pub fn test_config(webhook_api_key: Option<&str>) -> Config {
    Config {
        bind_address: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        groq_api_key: "test-groq-key".to_string(),
        webhook_api_key: webhook_api_key.map(str::to_string),
        llm_base_url: GROQ_API_BASE.to_string(),
        chat_model: DEFAULT_CHAT_MODEL.to_string(),
        transcript_window: None,
        failure_policy: FailurePolicy::Apologize,
        log_filter: "info".to_string(),
    }
}

pub fn app_state(llm: MockLlm, webhook_api_key: Option<&str>) -> Arc<AppState> {
    Arc::new(AppState {
        llm_client: Arc::new(llm),
        persona: Arc::new(Persona::default()),
        config: Arc::new(test_config(webhook_api_key)),
    })
}

/// Builds an upstream stream from text chunks and injected failures.
pub fn scripted_stream(items: Vec<Result<&'static str, &'static str>>) -> LLMStream {
    Box::pin(stream::iter(items.into_iter().map(|item| match item {
        Ok(text) => Ok(LLMStreamEvent::TextChunk(text.to_string())),
        Err(msg) => Err(OpenAIError::StreamError(msg.to_string())),
    })))
}

/// Collects formatted log lines so tests can assert on what was logged.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// A subscriber that writes plain-text `INFO` and above into this capture.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let writer = self.clone();
        tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
