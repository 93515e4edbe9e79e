//! SAGE application layer.
//!
//! Orchestrates one tutoring session: the per-turn routing pipeline, the
//! detached enrichment scheduler, and the `SessionService` facade the
//! presentation layer talks to.
//!
//! # Module Structure
//!
//! - `enrichment`: bounded queue + worker for best-effort materials generation
//! - `session_service`: the host-facing facade owning all session state
//! - `turn_pipeline`: the CLASSIFY → ROUTE → SYNTHESIZE → PERSIST state machine

pub mod enrichment;
pub mod session_service;
pub mod turn_pipeline;

pub use enrichment::{EnrichmentJob, EnrichmentScheduler};
pub use session_service::SessionService;
pub use turn_pipeline::{TurnOutcome, TurnPipeline};
