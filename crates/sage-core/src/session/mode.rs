//! Interaction mode types.

use serde::{Deserialize, Serialize};

/// The response strategy the router selects a child producer for.
///
/// The mode is chosen by the learner (or the host UI) per turn; it decides
/// which child context producer, if any, augments the synthesis request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Plain tutoring: no supplementary context producer.
    #[default]
    Standard,
    /// Web-grounded research: the research producer supplies context and sources.
    Research,
    /// Notes-grounded answering: the notebook producer supplies context from
    /// the active topic's notebook.
    Notebook,
}
