//! Topic domain model.
//!
//! A topic is a tracked subject of study with its own message history and
//! accumulated study artifacts. Topics are created either as the session's
//! main anchor (on reset) or lazily when the shift classifier detects a jump
//! to a new subject.

use crate::session::ConversationMessage;
use serde::{Deserialize, Serialize};

/// A generated two-sided study card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Prompt side.
    pub front: String,
    /// Answer side.
    pub back: String,
}

/// A generated multiple-choice quiz item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    /// The question text.
    pub question: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_index: usize,
    /// Explanation shown after answering.
    pub explanation: String,
}

/// A free-response exam question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamQuestion {
    /// The question text.
    pub prompt: String,
    /// Reference answer used for review.
    pub answer: String,
}

/// A subject of study tracked across the session.
///
/// Invariants (enforced by the store, not this struct):
/// - `name` is unique case-insensitively among stored topics
/// - exactly one topic per session has `is_main` set
/// - `messages` is append-only, never reordered or pruned
/// - `knowledge_base` grows strictly by append within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Opaque stable identifier (UUID format), immutable.
    pub id: String,
    /// Human-readable label, immutable (rename is unsupported).
    pub name: String,
    /// Creation timestamp (ISO 8601 format), immutable.
    pub created_at: String,
    /// Whether this is the session's anchor topic.
    pub is_main: bool,
    /// Ordered, append-only conversation history for this topic.
    pub messages: Vec<ConversationMessage>,
    /// Accumulated newline-delimited knowledge summaries.
    pub knowledge_base: String,
    /// Generated flashcards, append-only, deliberately undeduplicated.
    pub flashcards: Vec<Flashcard>,
    /// Generated quiz items, append-only, deliberately undeduplicated.
    pub quiz_items: Vec<QuizItem>,
    /// Exam content, replaced wholesale on regeneration.
    pub exam_questions: Vec<ExamQuestion>,
    /// Learner-supplied notes, fully replaceable (last write wins).
    pub notebook_content: Option<String>,
}

impl Topic {
    /// Creates an empty topic with a fresh id and the current timestamp.
    pub fn new(name: impl Into<String>, is_main: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            is_main,
            messages: Vec::new(),
            knowledge_base: String::new(),
            flashcards: Vec::new(),
            quiz_items: Vec::new(),
            exam_questions: Vec::new(),
            notebook_content: None,
        }
    }
}

/// Read-only bundle of a topic's study artifacts.
///
/// Returned as a unit so the presentation layer can render a topic's
/// materials without issuing several store reads. Missing topics yield the
/// default (all-empty) bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicContent {
    /// Generated flashcards.
    pub flashcards: Vec<Flashcard>,
    /// Generated quiz items.
    pub quiz_items: Vec<QuizItem>,
    /// Current exam content.
    pub exam_questions: Vec<ExamQuestion>,
    /// Learner-supplied notes, if any.
    pub notebook_content: Option<String>,
    /// Accumulated knowledge summaries.
    pub knowledge_base: String,
}
