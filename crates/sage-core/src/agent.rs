//! Boundary traits for the external inference services.
//!
//! The core performs no natural-language understanding itself; these traits
//! are the seams where classification, context production, synthesis, and
//! materials generation are delegated. `sage-interaction` provides
//! API-backed implementations; tests script them directly.

use crate::error::Result;
use crate::session::{ConversationMessage, SourceRef};
use crate::topic::{Flashcard, QuizItem};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The classifier's verdict on a single utterance.
///
/// When `is_new_topic` is false, `topic_name` equals the current subject
/// name so callers can treat the field uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDecision {
    /// Whether the utterance jumped to a distinct academic subject.
    pub is_new_topic: bool,
    /// The subject the utterance belongs to.
    pub topic_name: String,
}

impl ShiftDecision {
    /// The continuity fallback: no shift, current subject unchanged.
    ///
    /// Used whenever the classifier call fails; the design biases toward
    /// continuity, never toward spurious switching.
    pub fn no_shift(current_topic: impl Into<String>) -> Self {
        Self {
            is_new_topic: false,
            topic_name: current_topic.into(),
        }
    }
}

/// Supplementary context produced by the research producer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchFindings {
    /// Context text to feed into synthesis.
    pub text: String,
    /// Sources backing the text, forwarded as citations.
    pub sources: Vec<SourceRef>,
}

/// A small supplementary materials bundle generated after a turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyMaterials {
    /// Generated flashcards.
    pub flashcards: Vec<Flashcard>,
    /// Generated quiz items.
    pub quiz_items: Vec<QuizItem>,
}

/// Decides whether an utterance changed subject.
///
/// Contract: follow-ups, clarifications, requests for examples, sub-topic
/// drill-downs, and generic prompts ("why?", "explain more") are NOT topic
/// shifts; only a jump to a distinct academic subject or field counts.
#[async_trait]
pub trait ShiftClassifier: Send + Sync {
    /// Classifies the latest utterance against the current subject.
    ///
    /// # Arguments
    ///
    /// * `current_topic` - Name of the currently active subject
    /// * `utterance` - The learner's latest message
    /// * `history` - A short bounded rolling window of recent turns
    async fn classify(
        &self,
        current_topic: &str,
        utterance: &str,
        history: &[ConversationMessage],
    ) -> Result<ShiftDecision>;
}

/// Turns a free-text query into web-grounded supplementary context.
#[async_trait]
pub trait ResearchProducer: Send + Sync {
    /// Researches the query and returns context text plus sources.
    async fn research(&self, query: &str) -> Result<ResearchFindings>;
}

/// Turns the learner's notes into notes-grounded supplementary context.
#[async_trait]
pub trait NotebookProducer: Send + Sync {
    /// Builds context from the topic's notebook content and the query.
    ///
    /// An empty notebook yields fixed instructional text telling the
    /// synthesis step to prompt the learner to supply notes.
    async fn answer_from_notes(&self, notebook_text: &str, query: &str) -> Result<String>;
}

/// Stateful multi-turn synthesis scoped to a tutoring persona.
///
/// The engine retains all prior turns for the session internally; callers
/// never resend history.
#[async_trait]
pub trait ConversationEngine: Send + Sync {
    /// Synthesizes the tutor's reply for the newest turn.
    async fn synthesize(&self, turn_content: &str) -> Result<String>;

    /// Drops the retained history. Called on session reset.
    async fn reset_history(&self);
}

/// Generates a small supplementary materials bundle for a topic.
#[async_trait]
pub trait MaterialsGenerator: Send + Sync {
    /// Generates a handful of flashcards and quiz items.
    ///
    /// # Arguments
    ///
    /// * `topic_name` - The (post-shift) subject name
    /// * `seed_context` - Seed built from the turn's question/answer pair
    async fn generate_micro_materials(
        &self,
        topic_name: &str,
        seed_context: &str,
    ) -> Result<StudyMaterials>;
}
