//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the shared,
//! read-only resources handed to every handler and WebSocket session.

use crate::config::Config;
use callrelay_core::{llm_client::LLMClient, persona::Persona};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub llm_client: Arc<dyn LLMClient>,
    pub persona: Arc<Persona>,
    pub config: Arc<Config>,
}
