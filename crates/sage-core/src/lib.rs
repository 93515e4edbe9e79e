//! SAGE core domain layer.
//!
//! # Module Structure
//!
//! - `agent`: boundary traits for the external inference services
//! - `config`: behavioral tuning configuration
//! - `error`: the shared `SageError` type and `Result` alias
//! - `session`: session-level value objects (messages, mode, snapshot)
//! - `topic`: the topic entity and its in-memory store

pub mod agent;
pub mod config;
pub mod error;
pub mod session;
pub mod topic;

// Re-export common error type
pub use error::{Result, SageError};
