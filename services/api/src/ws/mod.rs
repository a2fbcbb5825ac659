//! LLM WebSocket Endpoint
//!
//! This module contains the logic for serving the voice platform's custom-LLM
//! WebSocket protocol. It is structured into submodules:
//!
//! - `protocol`: Defines the JSON envelopes exchanged with the platform.
//! - `session`: Manages the WebSocket connection lifecycle and event dispatch.
//! - `responder`: Drafts streamed answers from the upstream LLM.

pub mod protocol;
pub mod responder;
pub mod session;

pub use session::ws_handler;
