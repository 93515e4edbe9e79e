//! Session snapshot value object and its holder.
//!
//! The snapshot is the wholesale, replaceable representation of "where the
//! learner currently is": lesson units, position, accumulated lesson context,
//! the full chat transcript, the active subject, and the interaction mode.
//! It is replaced as a unit on every meaningful update; consumers must treat
//! each snapshot as immutable once read.

use super::message::ConversationMessage;
use super::mode::InteractionMode;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A single unit of lesson content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonUnit {
    /// Short unit title shown in navigation.
    pub title: String,
    /// Unit body text used as the lesson anchor during synthesis.
    pub body: String,
}

/// A value object representing the learner's current position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Ordered list of lesson units.
    pub lesson_units: Vec<LessonUnit>,
    /// Index of the unit the learner is currently on.
    pub current_unit_index: usize,
    /// Accumulated lesson context text.
    pub lesson_context: String,
    /// Full chat transcript across all topics, in display order.
    pub chat: Vec<ConversationMessage>,
    /// Name of the currently active subject.
    pub active_topic_name: String,
    /// Active interaction mode.
    pub mode: InteractionMode,
}

/// Single mutable slot holding the latest full session view.
///
/// Writes replace the slot wholesale; there is no merging and no partial
/// field mutation. If two writers race, the later write wins outright.
#[derive(Default)]
pub struct SnapshotHolder {
    slot: RwLock<Option<SessionSnapshot>>,
}

impl SnapshotHolder {
    /// Creates an empty holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the current snapshot, if any.
    pub async fn get(&self) -> Option<SessionSnapshot> {
        self.slot.read().await.clone()
    }

    /// Replaces the current snapshot wholesale.
    pub async fn replace(&self, snapshot: SessionSnapshot) {
        *self.slot.write().await = Some(snapshot);
    }

    /// Clears the slot. Called on session reset.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}
