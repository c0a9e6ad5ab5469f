use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error};

/// Spoken in place of a reply whenever the model cannot be reached.
pub const APOLOGY: &str = "I'm sorry, but I couldn't retrieve that information right now.";

/// Base URL of a local Ollama runtime's OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama3.1";

#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("chat completion request failed: {0}")]
    Request(#[from] OpenAIError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LLM response had no text content")]
    EmptyReply,
}

/// A generic client for a chat-completion model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Sends `prompt` as a single user-role turn and returns the reply text.
    async fn reply(&self, prompt: String) -> Result<String, LLMError>;
}

/// An implementation of `LLMClient` for any OpenAI-compatible API,
/// including Ollama's `/v1` endpoint.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL and API key of the chat-completion service.
    /// * `model` - The model identifier to use for chat completions (e.g., "llama3.1").
    /// * `timeout` - Upper bound on a single request, connection included.
    pub fn new(config: OpenAIConfig, model: String, timeout: Duration) -> Result<Self, LLMError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client: Client::with_config(config).with_http_client(http_client),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LLMClient for OpenAICompatibleClient {
    async fn reply(&self, prompt: String) -> Result<String, LLMError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LLMError::EmptyReply)
    }
}

/// Asks the model for a reply, falling back to [`APOLOGY`] on any failure.
///
/// Failures are logged here and never reach the caller.
pub async fn get_reply(client: &dyn LLMClient, prompt: String) -> String {
    match client.reply(prompt).await {
        Ok(reply) => {
            debug!(chars = reply.len(), "Received model reply");
            reply
        }
        Err(e) => {
            error!(error = %e, "Error querying language model");
            APOLOGY.to_string()
        }
    }
}
