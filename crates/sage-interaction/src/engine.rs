//! Stateful conversation engine scoped to a tutoring persona.
//!
//! The engine owns the session's full synthesis history: each turn appends
//! the composite turn content and the model's reply, so the router never
//! resends prior turns itself.

use crate::chat_client::{ChatClient, ChatMessage};
use async_trait::async_trait;
use sage_core::agent::ConversationEngine;
use sage_core::{Result, SageError};
use tokio::sync::Mutex;

const TUTOR_SYSTEM_PROMPT: &str = "\
You are a patient, encouraging tutor guiding a learner through a study \
session. Answer at the learner's level, connect new material to what was \
already discussed, and keep replies focused on the subject at hand. When a \
turn includes supplementary context, ground your answer in it.";

/// Engine that keeps per-session chat history internally.
pub struct ApiConversationEngine {
    client: ChatClient,
    /// Prior turns for this session, system prompt excluded.
    history: Mutex<Vec<ChatMessage>>,
}

impl ApiConversationEngine {
    /// Creates an engine with empty history over the shared chat client.
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            history: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ConversationEngine for ApiConversationEngine {
    async fn synthesize(&self, turn_content: &str) -> Result<String> {
        // Hold the lock across the call so interleaved turns cannot corrupt
        // the alternating user/assistant sequence.
        let mut history = self.history.lock().await;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(TUTOR_SYSTEM_PROMPT));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(turn_content.to_string()));

        let reply = self
            .client
            .complete(&messages, false)
            .await
            .map_err(|e| SageError::synthesis(e.to_string()))?;

        history.push(ChatMessage::user(turn_content.to_string()));
        history.push(ChatMessage::assistant(reply.clone()));

        Ok(reply)
    }

    async fn reset_history(&self) {
        self.history.lock().await.clear();
    }
}
