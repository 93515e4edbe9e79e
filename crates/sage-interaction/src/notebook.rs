//! Notes-grounded context producer.
//!
//! The notebook contract is deterministic, so this producer runs locally:
//! an empty notebook yields fixed instructional text, otherwise the notes
//! are truncated to a character budget and wrapped in a strictly-from-material
//! instruction. A remote implementation can replace this behind the same
//! trait without touching the pipeline.

use async_trait::async_trait;
use sage_core::Result;
use sage_core::agent::NotebookProducer;

/// Context returned when the learner has not supplied any notes yet.
const EMPTY_NOTEBOOK_CONTEXT: &str = "\
The learner has not provided any notebook material for this topic. Ask the \
learner to paste or upload their notes before answering from them.";

/// Producer that answers strictly from the topic's notebook content.
pub struct BoundedNotebookProducer {
    /// Maximum number of notebook characters forwarded downstream.
    max_chars: usize,
}

impl BoundedNotebookProducer {
    /// Creates a producer with the given character budget.
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    fn truncate(&self, notebook_text: &str) -> String {
        // Respect char boundaries, not bytes.
        notebook_text.chars().take(self.max_chars).collect()
    }
}

#[async_trait]
impl NotebookProducer for BoundedNotebookProducer {
    async fn answer_from_notes(&self, notebook_text: &str, query: &str) -> Result<String> {
        if notebook_text.trim().is_empty() {
            return Ok(EMPTY_NOTEBOOK_CONTEXT.to_string());
        }

        Ok(format!(
            "Answer the question strictly from the learner's notes below. If \
the notes do not cover the question, say so plainly instead of guessing.\n\n\
Question: {query}\n\nNotes:\n{}",
            self.truncate(notebook_text)
        ))
    }
}
