pub mod conversation;
pub mod inventory;
pub mod llm_client;
pub mod prompt;
pub mod session;

/// Represents what the call flow wants the telephony runtime to do next.
///
/// This enum decouples the conversation logic from the markup the
/// telephony provider expects, so the core crate never deals with HTTP
/// or XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Speak the given text, then listen for more speech from the caller.
    Prompt(String),
    /// Speak the given text and stop listening; the call is winding down.
    Farewell(String),
}
