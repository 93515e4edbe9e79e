//! The per-turn routing pipeline.
//!
//! One turn runs strictly sequentially through
//! CLASSIFY → ROUTE → SYNTHESIZE → PERSIST, then schedules enrichment
//! detached from the turn's completion. Classification and producer
//! failures degrade and the turn proceeds; only a synthesis failure crosses
//! the turn boundary as an error.

use crate::enrichment::{EnrichmentJob, EnrichmentScheduler};
use sage_core::agent::{
    ConversationEngine, NotebookProducer, ResearchProducer, ShiftClassifier, ShiftDecision,
};
use sage_core::config::SageConfig;
use sage_core::session::{ConversationMessage, InteractionMode, MessageRole, SourceRef};
use sage_core::topic::TopicStore;
use sage_core::{Result, SageError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Degraded context used when the research producer fails.
const RESEARCH_UNAVAILABLE: &str = "Research is currently unavailable; answer from your own knowledge and say that live sources could not be consulted.";

/// Degraded context used when the notebook producer fails.
const NOTEBOOK_UNAVAILABLE: &str = "The learner's notes are currently unavailable; answer from your own knowledge and mention that the notes could not be consulted.";

/// What a completed turn hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// The tutor's reply, as persisted (citations included on the research path).
    pub response: ConversationMessage,
    /// The classifier's verdict for this turn.
    pub shift: ShiftDecision,
}

/// Orchestrates one turn: composes the classifier, producers, and
/// conversation engine, and triggers the store mutations.
pub struct TurnPipeline {
    store: Arc<TopicStore>,
    classifier: Arc<dyn ShiftClassifier>,
    research: Arc<dyn ResearchProducer>,
    notebook: Arc<dyn NotebookProducer>,
    engine: Arc<dyn ConversationEngine>,
    scheduler: Arc<EnrichmentScheduler>,
    config: SageConfig,
}

impl TurnPipeline {
    /// Creates a pipeline over the injected store and boundary services.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<TopicStore>,
        classifier: Arc<dyn ShiftClassifier>,
        research: Arc<dyn ResearchProducer>,
        notebook: Arc<dyn NotebookProducer>,
        engine: Arc<dyn ConversationEngine>,
        scheduler: Arc<EnrichmentScheduler>,
        config: SageConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            research,
            notebook,
            engine,
            scheduler,
            config,
        }
    }

    /// Runs one full turn.
    ///
    /// # Arguments
    ///
    /// * `utterance` - The learner's latest message
    /// * `mode` - Which child producer, if any, augments synthesis
    /// * `recent_history` - Recent turns; only the configured window is
    ///   forwarded to the classifier
    /// * `lesson_anchor` - Current lesson-unit anchor text, may be empty
    ///
    /// # Errors
    ///
    /// Returns an error only when synthesis fails. The learner's message is
    /// persisted before synthesis runs, so a failed turn keeps the question
    /// but records no reply.
    pub async fn process_turn(
        &self,
        utterance: &str,
        mode: InteractionMode,
        recent_history: &[ConversationMessage],
        lesson_anchor: &str,
    ) -> Result<TurnOutcome> {
        // CLASSIFY. The subject active before classification is the
        // persistence target for the learner's message.
        let previous_topic = self.store.active().await;
        let current_name = previous_topic
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_default();

        let window_start = recent_history
            .len()
            .saturating_sub(self.config.history_window);
        let shift = match self
            .classifier
            .classify(&current_name, utterance, &recent_history[window_start..])
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(
                    target: "turn_pipeline",
                    "Classifier failed, falling back to continuity: {}",
                    e
                );
                ShiftDecision::no_shift(&current_name)
            }
        };

        // The question that triggered a shift stays attributed to the
        // subject it was asked under.
        if let Some(previous) = &previous_topic {
            self.store
                .append_message(
                    &previous.id,
                    ConversationMessage::new(MessageRole::Learner, utterance),
                )
                .await;
        }

        if shift.is_new_topic {
            let topic = self.store.create_or_get(&shift.topic_name, false).await;
            self.store.set_active(&topic.id).await;
            tracing::info!(
                target: "turn_pipeline",
                "Topic shift detected: '{}' -> '{}'",
                current_name,
                topic.name
            );
        }

        // ROUTE.
        let (producer_context, citations) = self.route(utterance, mode).await;
        let turn_content =
            Self::compose_turn_content(utterance, &shift, lesson_anchor, producer_context);

        // SYNTHESIZE. The only step whose failure fails the turn.
        let reply = self
            .engine
            .synthesize(&turn_content)
            .await
            .map_err(|e| SageError::synthesis(e.to_string()))?;

        // PERSIST the reply against the subject active after classification.
        let response =
            ConversationMessage::new(MessageRole::Tutor, reply).with_citations(citations);
        let active_topic = self.store.active().await;
        if let Some(active) = &active_topic {
            self.store.append_message(&active.id, response.clone()).await;
        }

        // ENRICH, detached from the turn's completion.
        if let Some(active) = &active_topic {
            self.scheduler.submit(EnrichmentJob {
                topic_id: active.id.clone(),
                topic_name: active.name.clone(),
                seed_context: format!("Q: {utterance}\nA: {}", response.content),
            });
        }

        Ok(TurnOutcome { response, shift })
    }

    /// Invokes the producer selected by the interaction mode.
    ///
    /// Producer failures substitute degraded context so the turn proceeds;
    /// citations are only ever attached on a successful research call.
    async fn route(
        &self,
        utterance: &str,
        mode: InteractionMode,
    ) -> (Option<String>, Vec<SourceRef>) {
        match mode {
            InteractionMode::Standard => (None, Vec::new()),
            InteractionMode::Research => match self.research.research(utterance).await {
                Ok(findings) => (Some(findings.text), findings.sources),
                Err(e) => {
                    tracing::warn!(
                        target: "turn_pipeline",
                        "Research producer failed, degrading: {}",
                        e
                    );
                    (Some(RESEARCH_UNAVAILABLE.to_string()), Vec::new())
                }
            },
            InteractionMode::Notebook => {
                // Fetched fresh here rather than at turn start: a detected
                // shift changes which topic's notebook applies.
                let notebook_text = self
                    .store
                    .active()
                    .await
                    .and_then(|t| t.notebook_content)
                    .unwrap_or_default();
                match self
                    .notebook
                    .answer_from_notes(&notebook_text, utterance)
                    .await
                {
                    Ok(context) => (Some(context), Vec::new()),
                    Err(e) => {
                        tracing::warn!(
                            target: "turn_pipeline",
                            "Notebook producer failed, degrading: {}",
                            e
                        );
                        (Some(NOTEBOOK_UNAVAILABLE.to_string()), Vec::new())
                    }
                }
            }
        }
    }

    /// Builds the composite context block sent to the engine as the newest
    /// turn: pivot note, lesson anchor, producer output, then the raw
    /// utterance.
    fn compose_turn_content(
        utterance: &str,
        shift: &ShiftDecision,
        lesson_anchor: &str,
        producer_context: Option<String>,
    ) -> String {
        let mut content = String::new();
        if shift.is_new_topic {
            content.push_str(&format!(
                "System note: the learner has switched to subject {}; pivot immediately.\n\n",
                shift.topic_name
            ));
        }
        if !lesson_anchor.is_empty() {
            content.push_str(&format!("Current lesson unit:\n{lesson_anchor}\n\n"));
        }
        if let Some(context) = producer_context {
            content.push_str(&format!("Supplementary context:\n{context}\n\n"));
        }
        content.push_str(&format!("Learner: {utterance}"));
        content
    }
}
