//! Conversation message types.
//!
//! Types for representing turn records in a topic's conversation history,
//! including roles, content, and research citations.

use serde::{Deserialize, Serialize};

/// Represents the role of a message in a tutoring conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message from the learner.
    Learner,
    /// Message from the tutor (synthesized reply).
    Tutor,
}

/// A reference to an external source backing a research-grounded reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Human-readable title of the source.
    pub title: String,
    /// Where the source can be found (typically a URL).
    pub locator: String,
}

/// A single turn record in a topic's conversation history.
///
/// Each message has a role, content, an optional list of citations (only
/// populated for research-grounded tutor replies), and a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Sources cited by the message, empty for most turns.
    #[serde(default)]
    pub citations: Vec<SourceRef>,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
}

impl ConversationMessage {
    /// Creates a message with the current timestamp and no citations.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            citations: Vec::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attaches citations to the message.
    pub fn with_citations(mut self, citations: Vec<SourceRef>) -> Self {
        self.citations = citations;
        self
    }
}
