//! API-backed study materials generator.

use crate::chat_client::{ChatClient, ChatMessage};
use async_trait::async_trait;
use sage_core::agent::{MaterialsGenerator, StudyMaterials};
use sage_core::config::SageConfig;
use sage_core::topic::{Flashcard, QuizItem};
use sage_core::{Result, SageError};
use serde::Deserialize;

const MATERIALS_SYSTEM_PROMPT: &str = "\
You create supplementary study materials for a tutoring session. Given a \
subject and a seed exchange, produce flashcards and multiple-choice quiz \
items that reinforce what was just discussed. Respond with a strict JSON \
object: {\"flashcards\": [{\"front\": string, \"back\": string}], \
\"quiz_items\": [{\"question\": string, \"options\": [string], \
\"correct_index\": number, \"explanation\": string}]}.";

/// Generator that asks the chat model for a small materials bundle.
pub struct ApiMaterialsGenerator {
    client: ChatClient,
    flashcard_count: usize,
    quiz_count: usize,
}

#[derive(Deserialize)]
struct MaterialsReply {
    #[serde(default)]
    flashcards: Vec<FlashcardReply>,
    #[serde(default)]
    quiz_items: Vec<QuizReply>,
}

#[derive(Deserialize)]
struct FlashcardReply {
    front: String,
    back: String,
}

#[derive(Deserialize)]
struct QuizReply {
    question: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
}

impl ApiMaterialsGenerator {
    /// Creates a generator with explicit batch sizes.
    pub fn new(client: ChatClient, flashcard_count: usize, quiz_count: usize) -> Self {
        Self {
            client,
            flashcard_count,
            quiz_count,
        }
    }

    /// Creates a generator sized from the behavioral configuration.
    pub fn from_config(client: ChatClient, config: &SageConfig) -> Self {
        Self::new(
            client,
            config.enrichment_flashcards,
            config.enrichment_quizzes,
        )
    }
}

#[async_trait]
impl MaterialsGenerator for ApiMaterialsGenerator {
    async fn generate_micro_materials(
        &self,
        topic_name: &str,
        seed_context: &str,
    ) -> Result<StudyMaterials> {
        let prompt = format!(
            "Subject: {topic_name}\n\nSeed exchange:\n{seed_context}\n\n\
Produce {} flashcards and {} quiz items.",
            self.flashcard_count, self.quiz_count
        );
        let messages = [
            ChatMessage::system(MATERIALS_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ];

        let reply = self
            .client
            .complete(&messages, true)
            .await
            .map_err(|e| SageError::enrichment(e.to_string()))?;

        let parsed: MaterialsReply = serde_json::from_str(&reply)
            .map_err(|e| SageError::enrichment(format!("Malformed materials bundle: {e}")))?;

        Ok(StudyMaterials {
            flashcards: parsed
                .flashcards
                .into_iter()
                .map(|c| Flashcard {
                    front: c.front,
                    back: c.back,
                })
                .collect(),
            quiz_items: parsed
                .quiz_items
                .into_iter()
                .map(|q| QuizItem {
                    question: q.question,
                    options: q.options,
                    correct_index: q.correct_index,
                    explanation: q.explanation,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_sizes_come_from_config() {
        let config = SageConfig {
            enrichment_flashcards: 5,
            enrichment_quizzes: 2,
            ..Default::default()
        };

        let generator =
            ApiMaterialsGenerator::from_config(ChatClient::new("key", "model"), &config);
        assert_eq!(generator.flashcard_count, 5);
        assert_eq!(generator.quiz_count, 2);
    }
}
