//! Session service facade.
//!
//! `SessionService` owns the topic store, the snapshot holder, the turn
//! pipeline, and the enrichment scheduler, and exposes the interface the
//! presentation layer consumes. The store is constructed here and injected
//! into the pipeline explicitly, so independent sessions get independent
//! state and tests get deterministic isolation.

use crate::enrichment::EnrichmentScheduler;
use crate::turn_pipeline::{TurnOutcome, TurnPipeline};
use sage_core::Result;
use sage_core::agent::{
    ConversationEngine, MaterialsGenerator, NotebookProducer, ResearchProducer, ShiftClassifier,
};
use sage_core::config::SageConfig;
use sage_core::session::{
    ConversationMessage, InteractionMode, SessionSnapshot, SnapshotHolder,
};
use sage_core::topic::{ExamQuestion, Topic, TopicContent, TopicStore};
use std::sync::Arc;

/// Coordinates one tutoring session end to end.
pub struct SessionService {
    store: Arc<TopicStore>,
    snapshots: SnapshotHolder,
    pipeline: TurnPipeline,
    engine: Arc<dyn ConversationEngine>,
    scheduler: Arc<EnrichmentScheduler>,
}

impl SessionService {
    /// Creates a session service over the injected boundary services.
    ///
    /// Spawns the enrichment worker; must be called from within a Tokio
    /// runtime.
    pub fn new(
        config: SageConfig,
        classifier: Arc<dyn ShiftClassifier>,
        research: Arc<dyn ResearchProducer>,
        notebook: Arc<dyn NotebookProducer>,
        engine: Arc<dyn ConversationEngine>,
        generator: Arc<dyn MaterialsGenerator>,
    ) -> Self {
        let store = Arc::new(TopicStore::new());
        let scheduler = Arc::new(EnrichmentScheduler::new(
            Arc::clone(&store),
            generator,
            config.enrichment_queue_capacity,
        ));
        let pipeline = TurnPipeline::new(
            Arc::clone(&store),
            classifier,
            research,
            notebook,
            Arc::clone(&engine),
            Arc::clone(&scheduler),
            config,
        );

        Self {
            store,
            snapshots: SnapshotHolder::new(),
            pipeline,
            engine,
            scheduler,
        }
    }

    /// Starts a fresh session: clears all topics, creates the main topic
    /// and makes it active, clears the snapshot, and drops the engine's
    /// retained history.
    pub async fn reset(&self, main_name: &str) -> Topic {
        tracing::info!(target: "session", "Session reset, main topic '{}'", main_name);
        self.snapshots.clear().await;
        self.engine.reset_history().await;
        self.store.reset(main_name).await
    }

    /// Runs one turn through the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error only when synthesis fails.
    pub async fn process_turn(
        &self,
        utterance: &str,
        mode: InteractionMode,
        recent_history: &[ConversationMessage],
        lesson_anchor: &str,
    ) -> Result<TurnOutcome> {
        self.pipeline
            .process_turn(utterance, mode, recent_history, lesson_anchor)
            .await
    }

    /// All topics, main first, then by ascending creation time.
    pub async fn list_topics(&self) -> Vec<Topic> {
        self.store.list().await
    }

    /// The currently active topic, if any.
    pub async fn active_topic(&self) -> Option<Topic> {
        self.store.active().await
    }

    /// The read-only artifact bundle for a topic; empty defaults for a
    /// missing id.
    pub async fn topic_content(&self, id: &str) -> TopicContent {
        self.store.topic_content(id).await
    }

    /// A topic's accumulated knowledge base; empty for a missing id.
    pub async fn knowledge_base(&self, id: &str) -> String {
        self.store.knowledge_base(id).await
    }

    /// Appends a knowledge summary to a topic. No-op on a missing id.
    pub async fn append_knowledge(&self, id: &str, text: &str) {
        self.store.append_knowledge(id, text).await;
    }

    /// Replaces a topic's notebook content. No-op on a missing id.
    pub async fn set_notebook_content(&self, id: &str, text: &str) {
        self.store.set_notebook_content(id, text).await;
    }

    /// Replaces a topic's exam content wholesale. No-op on a missing id.
    pub async fn set_exam_questions(&self, id: &str, questions: Vec<ExamQuestion>) {
        self.store.set_exam_questions(id, questions).await;
    }

    /// A topic's exam content; empty for a missing id.
    pub async fn exam_questions(&self, id: &str) -> Vec<ExamQuestion> {
        self.store.exam_questions(id).await
    }

    /// The latest session snapshot, if one has been published.
    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        self.snapshots.get().await
    }

    /// Publishes a new session snapshot, replacing the previous one
    /// wholesale.
    pub async fn set_snapshot(&self, snapshot: SessionSnapshot) {
        self.snapshots.replace(snapshot).await;
    }

    /// Waits for all scheduled enrichment jobs to finish.
    ///
    /// Observability hook; turns never depend on it.
    pub async fn wait_enrichment_idle(&self) {
        self.scheduler.wait_idle().await;
    }
}
