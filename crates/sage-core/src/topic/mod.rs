//! Topic domain module.
//!
//! # Module Structure
//!
//! - `model`: the topic entity and its study-artifact types
//! - `store`: the in-memory entity store with the active-topic pointer

mod model;
mod store;

// Re-export public API
pub use model::{ExamQuestion, Flashcard, QuizItem, Topic, TopicContent};
pub use store::TopicStore;
