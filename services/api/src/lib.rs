//! Bookline API Library Crate
//!
//! This library contains the web-facing half of the bookstore voice
//! assistant: configuration, webhook payloads, spoken-response markup,
//! handlers, and routing. The `api` binary is a thin wrapper around it.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod twiml;
