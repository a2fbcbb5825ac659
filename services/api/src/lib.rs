//! Call Relay API Library Crate
//!
//! This library contains the web service that bridges the voice platform's
//! WebSocket protocol and the upstream LLM: configuration, application state,
//! HTTP handlers, webhook signature checks, WebSocket logic, and routing. The
//! `api` binary is a thin wrapper around it.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod signature;
pub mod state;
pub mod ws;
