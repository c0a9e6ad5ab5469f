//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the call flow and
//! its collaborators, created once at startup and shared by all handlers.

use bookline_core::{
    conversation::CallFlow, inventory::InventorySource, llm_client::LLMClient,
    session::SessionStore,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub call_flow: Arc<CallFlow>,
}

impl AppState {
    /// Wires the call flow from its injected collaborators.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        inventory: Arc<dyn InventorySource>,
        llm_client: Arc<dyn LLMClient>,
    ) -> Self {
        Self {
            call_flow: Arc::new(CallFlow::new(sessions, inventory, llm_client)),
        }
    }
}
