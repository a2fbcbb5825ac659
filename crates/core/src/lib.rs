//! Call Relay Core
//!
//! Provider-agnostic conversation logic shared by the relay service: the persona
//! script, transcript types, prompt construction and the streaming LLM client.

pub mod llm_client;
pub mod persona;
pub mod prompt;
pub mod transcript;
