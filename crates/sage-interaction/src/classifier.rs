//! API-backed topic-shift classifier.

use crate::chat_client::{ChatClient, ChatMessage};
use async_trait::async_trait;
use sage_core::agent::{ShiftClassifier, ShiftDecision};
use sage_core::session::{ConversationMessage, MessageRole};
use sage_core::{Result, SageError};
use serde::Deserialize;

const CLASSIFIER_SYSTEM_PROMPT: &str = "\
You decide whether a learner's latest message switches to a different academic \
subject than the one currently being tutored. Follow-ups, clarifications, \
requests for examples, sub-topic drill-downs, and generic prompts such as \
\"why?\" or \"explain more\" are NOT topic switches. Only a jump to a distinct \
academic subject or field counts. Respond with a strict JSON object: \
{\"is_new_topic\": boolean, \"topic_name\": string}. When is_new_topic is \
false, topic_name must be exactly the current subject name.";

/// Classifier that delegates the shift decision to the chat model.
pub struct ApiShiftClassifier {
    client: ChatClient,
}

#[derive(Deserialize)]
struct ClassifierVerdict {
    is_new_topic: bool,
    topic_name: String,
}

impl ApiShiftClassifier {
    /// Creates a classifier over the shared chat client.
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    fn build_prompt(
        current_topic: &str,
        utterance: &str,
        history: &[ConversationMessage],
    ) -> String {
        let mut prompt = format!("Current subject: {current_topic}\n\nRecent turns:\n");
        for message in history {
            let speaker = match message.role {
                MessageRole::Learner => "learner",
                MessageRole::Tutor => "tutor",
            };
            prompt.push_str(&format!("{speaker}: {}\n", message.content));
        }
        prompt.push_str(&format!("\nLatest learner message: {utterance}"));
        prompt
    }
}

#[async_trait]
impl ShiftClassifier for ApiShiftClassifier {
    async fn classify(
        &self,
        current_topic: &str,
        utterance: &str,
        history: &[ConversationMessage],
    ) -> Result<ShiftDecision> {
        let messages = [
            ChatMessage::system(CLASSIFIER_SYSTEM_PROMPT),
            ChatMessage::user(Self::build_prompt(current_topic, utterance, history)),
        ];

        let reply = self
            .client
            .complete(&messages, true)
            .await
            .map_err(|e| SageError::classification(e.to_string()))?;

        let verdict: ClassifierVerdict = serde_json::from_str(&reply)
            .map_err(|e| SageError::classification(format!("Malformed verdict: {e}")))?;

        // Enforce the contract: a non-shift always echoes the current
        // subject name, whatever the model wrote.
        if verdict.is_new_topic {
            Ok(ShiftDecision {
                is_new_topic: true,
                topic_name: verdict.topic_name,
            })
        } else {
            Ok(ShiftDecision::no_shift(current_topic))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_core::session::{ConversationMessage, MessageRole};

    #[test]
    fn prompt_includes_history_and_utterance() {
        let history = vec![
            ConversationMessage::new(MessageRole::Learner, "what is entropy?"),
            ConversationMessage::new(MessageRole::Tutor, "a measure of disorder"),
        ];
        let prompt =
            ApiShiftClassifier::build_prompt("Thermodynamics", "why is that?", &history);

        assert!(prompt.contains("Current subject: Thermodynamics"));
        assert!(prompt.contains("learner: what is entropy?"));
        assert!(prompt.contains("tutor: a measure of disorder"));
        assert!(prompt.contains("Latest learner message: why is that?"));
    }
}
