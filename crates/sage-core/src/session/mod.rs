//! Session-level value objects.
//!
//! # Module Structure
//!
//! - `message`: conversation turn records (`MessageRole`, `ConversationMessage`, `SourceRef`)
//! - `mode`: response strategy selection (`InteractionMode`)
//! - `snapshot`: the replace-wholesale session view (`SessionSnapshot`, `SnapshotHolder`)

mod message;
mod mode;
mod snapshot;

// Re-export public API
pub use message::{ConversationMessage, MessageRole, SourceRef};
pub use mode::InteractionMode;
pub use snapshot::{LessonUnit, SessionSnapshot, SnapshotHolder};
