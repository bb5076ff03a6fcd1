//! Chat client: the direct responder backed by a completion provider.
//!
//! The client owns the conversation history. Every request replays the full
//! history (system prompt first), and successful replies are appended so the
//! next turn sees them.

use std::sync::Arc;

use async_trait::async_trait;
use parley_core::error::RemoteServiceError;
use parley_core::message::{Conversation, Message};
use parley_core::provider::{Provider, ProviderRequest};
use parley_core::responder::Responder;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Message attached to every remote failure surfaced by the client.
pub const REQUEST_FAILED: &str = "Error during remote completion request";

/// A conversational client over a [`Provider`].
pub struct ChatClient {
    provider: Arc<dyn Provider>,
    model: String,
    max_tokens: u32,
    conversation: Mutex<Conversation>,
}

impl ChatClient {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        max_tokens: u32,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
            conversation: Mutex::new(Conversation::with_system_prompt(system_prompt)),
        }
    }

    /// Build a client from the application config.
    pub fn from_config(provider: Arc<dyn Provider>, config: &parley_config::AppConfig) -> Self {
        Self::new(provider, &config.model, config.max_tokens, &config.system_prompt)
    }

    /// Send one user message and return the assistant's reply.
    pub async fn send_request(&self, input: &str) -> Result<String, RemoteServiceError> {
        let mut conversation = self.conversation.lock().await;
        conversation.push(Message::user(input));

        let request = ProviderRequest::new(&self.model, conversation.messages.clone())
            .with_max_tokens(self.max_tokens);

        debug!(
            provider = self.provider.name(),
            messages = conversation.len(),
            "Requesting completion"
        );

        let response = self.provider.complete(request).await.map_err(|e| {
            warn!(error = %e, "Completion request failed");
            RemoteServiceError::with_source(REQUEST_FAILED, e)
        })?;

        if let Some(usage) = &response.usage {
            info!(model = %response.model, tokens = usage.total_tokens, "Completion received");
        }

        let reply = response.message.content.clone();
        conversation.push(Message::assistant(reply.clone()));
        Ok(reply)
    }

    /// Forget the conversation, keeping only the system prompt.
    pub async fn reset_conversation(&self) {
        self.conversation.lock().await.reset();
    }

    /// A copy of the conversation history.
    pub async fn messages(&self) -> Vec<Message> {
        self.conversation.lock().await.messages.clone()
    }
}

#[async_trait]
impl Responder for ChatClient {
    async fn respond(&self, input: &str) -> Result<String, RemoteServiceError> {
        self.send_request(input).await
    }
}
