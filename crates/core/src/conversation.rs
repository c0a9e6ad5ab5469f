//! Call Flow Controller
//!
//! Drives a phone call through greet → gather → respond → gather. The
//! controller itself holds no per-call state; transcripts live in the
//! injected `SessionStore`.

use crate::{
    Command,
    inventory::{InventorySource, load_inventory},
    llm_client::{LLMClient, get_reply},
    prompt::compose_prompt,
    session::SessionStore,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Spoken when a call connects.
pub const GREETING: &str = "Hello! I'm your bookstore assistant. How can I help you today?";

/// Spoken when the caller signals they are done.
pub const CLOSING_REMARK: &str = "You're very welcome! Have a great day.";

/// Call identifier used when the provider does not send one.
pub const UNKNOWN_CALL_SID: &str = "unknown";

/// Substrings that end the conversation when found in the normalized speech.
pub const FAREWELL_PHRASES: [&str; 6] = [
    "thank you",
    "thanks",
    "that's all",
    "goodbye",
    "bye",
    "no more questions",
];

/// Trims and lower-cases a speech recognition result.
pub fn normalize_speech(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether already-normalized speech contains any farewell phrase.
pub fn is_farewell(normalized: &str) -> bool {
    FAREWELL_PHRASES
        .iter()
        .any(|phrase| normalized.contains(phrase))
}

pub struct CallFlow {
    sessions: Arc<dyn SessionStore>,
    inventory: Arc<dyn InventorySource>,
    llm_client: Arc<dyn LLMClient>,
}

impl CallFlow {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        inventory: Arc<dyn InventorySource>,
        llm_client: Arc<dyn LLMClient>,
    ) -> Self {
        Self {
            sessions,
            inventory,
            llm_client,
        }
    }

    /// Handles the call-start webhook: resets the transcript and greets the caller.
    #[instrument(skip(self))]
    pub async fn start_call(&self, call_sid: &str) -> Command {
        self.sessions.start_session(call_sid).await;
        info!("Starting conversation");
        Command::Prompt(GREETING.to_string())
    }

    /// Handles one speech result from the caller.
    #[instrument(skip(self, raw_speech))]
    pub async fn handle_speech(&self, call_sid: &str, raw_speech: &str) -> Command {
        let user_input = normalize_speech(raw_speech);
        debug!(user_said = %user_input, "Handling input");

        if is_farewell(&user_input) {
            info!("Caller said goodbye");
            return Command::Farewell(CLOSING_REMARK.to_string());
        }

        let history = self.sessions.history(call_sid).await;
        let books = load_inventory(self.inventory.as_ref()).await;
        let prompt = compose_prompt(&user_input, &books, &history);
        let reply = get_reply(self.llm_client.as_ref(), prompt).await;

        self.sessions
            .append_turn(
                call_sid,
                format!("User: {user_input}"),
                format!("Assistant: {reply}"),
            )
            .await;

        Command::Prompt(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        inventory::{InventoryError, InventoryItem, InventoryLoad},
        llm_client::{APOLOGY, LLMError, MockLLMClient},
        session::InMemorySessionStore,
    };
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::time::Duration;

    struct FixedInventory(Vec<InventoryItem>);

    #[async_trait]
    impl InventorySource for FixedInventory {
        async fn load(&self) -> Result<InventoryLoad, InventoryError> {
            Ok(InventoryLoad {
                items: self.0.clone(),
                rejected: Vec::new(),
            })
        }
    }

    fn gone_girl() -> InventoryItem {
        InventoryItem {
            name: "Gone Girl".to_string(),
            author: "Gillian Flynn".to_string(),
            genre: "Thriller".to_string(),
            price: Decimal::new(1499, 2),
            quantity_available: 2,
            rating: 4.2,
            format: "Paperback".to_string(),
            language: "English".to_string(),
            pages: 432,
            discount_percent: 0.0,
            is_bestseller: true,
        }
    }

    fn flow(llm: MockLLMClient) -> (CallFlow, Arc<InMemorySessionStore>) {
        let sessions = Arc::new(InMemorySessionStore::new(Duration::from_secs(3600)));
        let flow = CallFlow::new(
            sessions.clone(),
            Arc::new(FixedInventory(vec![gone_girl()])),
            Arc::new(llm),
        );
        (flow, sessions)
    }

    #[test]
    fn test_normalize_speech() {
        assert_eq!(normalize_speech("  Do You Have DUNE?  "), "do you have dune?");
        assert_eq!(normalize_speech(""), "");
    }

    #[test]
    fn test_farewell_detection() {
        assert!(is_farewell(&normalize_speech("No thanks, Bye!")));
        assert!(is_farewell("that's all for today"));
        assert!(is_farewell("thank you so much"));
        assert!(!is_farewell(&normalize_speech("I'd like a refund")));
        assert!(!is_farewell(""));
    }

    #[tokio::test]
    async fn test_start_call_greets_and_resets() {
        let (flow, sessions) = flow(MockLLMClient::new());
        sessions
            .append_turn("CA1", "User: old".to_string(), "Assistant: old".to_string())
            .await;

        let command = flow.start_call("CA1").await;

        assert_eq!(command, Command::Prompt(GREETING.to_string()));
        assert!(sessions.history("CA1").await.is_empty());
    }

    #[tokio::test]
    async fn test_speech_turn_queries_model_and_records_transcript() {
        let mut llm = MockLLMClient::new();
        llm.expect_reply()
            .withf(|prompt| {
                prompt.contains("Gone Girl by Gillian Flynn")
                    && prompt.contains("The user asked: \"any thrillers?\"")
            })
            .times(1)
            .returning(|_| Ok("Gone Girl is in stock for $14.99.".to_string()));
        let (flow, sessions) = flow(llm);
        flow.start_call("CA1").await;

        let command = flow.handle_speech("CA1", "  Any Thrillers?").await;

        assert_eq!(
            command,
            Command::Prompt("Gone Girl is in stock for $14.99.".to_string())
        );
        assert_eq!(
            sessions.history("CA1").await,
            vec![
                "User: any thrillers?".to_string(),
                "Assistant: Gone Girl is in stock for $14.99.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_second_turn_sees_first_turn_in_prompt() {
        let mut llm = MockLLMClient::new();
        let mut seq = mockall::Sequence::new();
        llm.expect_reply()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("Yes, Gone Girl.".to_string()));
        llm.expect_reply()
            .withf(|prompt| prompt.contains("User: any thrillers\nAssistant: Yes, Gone Girl."))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("It is $14.99.".to_string()));
        let (flow, sessions) = flow(llm);
        flow.start_call("CA1").await;

        flow.handle_speech("CA1", "any thrillers").await;
        flow.handle_speech("CA1", "how much").await;

        assert_eq!(sessions.history("CA1").await.len(), 4);
    }

    #[tokio::test]
    async fn test_farewell_skips_model_and_keeps_session() {
        let mut llm = MockLLMClient::new();
        llm.expect_reply().never();
        let (flow, sessions) = flow(llm);
        flow.start_call("CA1").await;

        let command = flow.handle_speech("CA1", "Thanks, BYE").await;

        assert_eq!(command, Command::Farewell(CLOSING_REMARK.to_string()));
        assert_eq!(sessions.len().await, 1);
        assert!(sessions.history("CA1").await.is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_is_spoken_as_apology() {
        let mut llm = MockLLMClient::new();
        llm.expect_reply()
            .times(1)
            .returning(|_| Err(LLMError::EmptyReply));
        let (flow, sessions) = flow(llm);

        let command = flow.handle_speech("CA7", "do you have dune").await;

        assert_eq!(command, Command::Prompt(APOLOGY.to_string()));
        assert_eq!(
            sessions.history("CA7").await,
            vec![
                "User: do you have dune".to_string(),
                format!("Assistant: {APOLOGY}"),
            ]
        );
    }
}
