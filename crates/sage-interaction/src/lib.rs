//! SAGE interaction layer.
//!
//! API-backed implementations of the boundary traits defined in
//! `sage_core::agent`, built on a shared OpenAI-compatible Chat Completions
//! client, plus secret configuration loading.
//!
//! # Module Structure
//!
//! - `chat_client`: the shared REST client (`ChatClient`, `ChatMessage`)
//! - `classifier`: topic-shift classification (`ApiShiftClassifier`)
//! - `config`: secret configuration loading
//! - `engine`: stateful tutoring synthesis (`ApiConversationEngine`)
//! - `materials`: flashcard/quiz generation (`ApiMaterialsGenerator`)
//! - `notebook`: notes-grounded context (`BoundedNotebookProducer`)
//! - `research`: web-grounded context (`ApiResearchProducer`)

pub mod chat_client;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod materials;
pub mod notebook;
pub mod research;

pub use chat_client::{ChatClient, ChatMessage};
pub use classifier::ApiShiftClassifier;
pub use engine::ApiConversationEngine;
pub use materials::ApiMaterialsGenerator;
pub use notebook::BoundedNotebookProducer;
pub use research::ApiResearchProducer;
