//! Background enrichment scheduler.
//!
//! After each turn the router submits a job here instead of spawning a
//! detached task directly: jobs flow through a bounded queue into a single
//! worker that generates supplementary materials and appends them to the
//! (possibly since-reset) topic. Enrichment is best-effort: failures are
//! swallowed and logged, a full queue drops the job, and nothing here ever
//! blocks or fails the user-visible turn. Tests can observe completion via
//! [`EnrichmentScheduler::wait_idle`].

use sage_core::agent::MaterialsGenerator;
use sage_core::topic::TopicStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, mpsc};

/// A single enrichment request for one completed turn.
#[derive(Debug, Clone)]
pub struct EnrichmentJob {
    /// Id of the topic to append materials to (the post-shift topic).
    pub topic_id: String,
    /// Name of that topic, handed to the generator.
    pub topic_name: String,
    /// Seed built from the turn's question/answer pair.
    pub seed_context: String,
}

/// Bounded work queue feeding a single enrichment worker.
pub struct EnrichmentScheduler {
    tx: mpsc::Sender<EnrichmentJob>,
    in_flight: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl EnrichmentScheduler {
    /// Creates the scheduler and spawns its worker task.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `store` - Store the generated materials are appended to
    /// * `generator` - Materials generation boundary
    /// * `capacity` - Queue capacity; submissions beyond it are dropped
    pub fn new(
        store: Arc<TopicStore>,
        generator: Arc<dyn MaterialsGenerator>,
        capacity: usize,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<EnrichmentJob>(capacity);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let idle = Arc::new(Notify::new());

        let worker_in_flight = Arc::clone(&in_flight);
        let worker_idle = Arc::clone(&idle);
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                Self::run_job(&store, generator.as_ref(), &job).await;
                if worker_in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                    worker_idle.notify_waiters();
                }
            }
        });

        Self {
            tx,
            in_flight,
            idle,
        }
    }

    async fn run_job(store: &TopicStore, generator: &dyn MaterialsGenerator, job: &EnrichmentJob) {
        match generator
            .generate_micro_materials(&job.topic_name, &job.seed_context)
            .await
        {
            Ok(materials) => {
                tracing::debug!(
                    target: "enrichment",
                    "Generated {} flashcards and {} quiz items for '{}'",
                    materials.flashcards.len(),
                    materials.quiz_items.len(),
                    job.topic_name
                );
                // No-ops if a reset removed the topic in the meantime.
                store.add_flashcards(&job.topic_id, materials.flashcards).await;
                store.add_quizzes(&job.topic_id, materials.quiz_items).await;
            }
            Err(e) => {
                // Best-effort: swallowed, no retry.
                tracing::warn!(
                    target: "enrichment",
                    "Enrichment for '{}' failed: {}",
                    job.topic_name,
                    e
                );
            }
        }
    }

    /// Submits a job without blocking.
    ///
    /// When the queue is full the job is dropped with a warning; the turn
    /// that submitted it is unaffected.
    pub fn submit(&self, job: EnrichmentJob) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.tx.try_send(job) {
            if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                self.idle.notify_waiters();
            }
            tracing::warn!(target: "enrichment", "Enrichment job dropped: {}", e);
        }
    }

    /// Waits until every submitted job has finished.
    ///
    /// Test hook: lets tests observe completion without the main turn
    /// depending on it.
    pub async fn wait_idle(&self) {
        loop {
            if self.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            let notified = self.idle.notified();
            if self.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sage_core::agent::StudyMaterials;
    use sage_core::topic::{Flashcard, QuizItem};
    use sage_core::{Result, SageError};

    struct FixedGenerator;

    #[async_trait]
    impl MaterialsGenerator for FixedGenerator {
        async fn generate_micro_materials(
            &self,
            topic_name: &str,
            _seed_context: &str,
        ) -> Result<StudyMaterials> {
            Ok(StudyMaterials {
                flashcards: vec![Flashcard {
                    front: format!("What is {topic_name}?"),
                    back: "A subject".to_string(),
                }],
                quiz_items: vec![QuizItem {
                    question: "Pick one".to_string(),
                    options: vec!["a".to_string(), "b".to_string()],
                    correct_index: 0,
                    explanation: "a is right".to_string(),
                }],
            })
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl MaterialsGenerator for FailingGenerator {
        async fn generate_micro_materials(
            &self,
            _topic_name: &str,
            _seed_context: &str,
        ) -> Result<StudyMaterials> {
            Err(SageError::enrichment("model unavailable"))
        }
    }

    fn job_for(topic_id: &str, topic_name: &str) -> EnrichmentJob {
        EnrichmentJob {
            topic_id: topic_id.to_string(),
            topic_name: topic_name.to_string(),
            seed_context: "Q: q\nA: a".to_string(),
        }
    }

    #[tokio::test]
    async fn completed_jobs_append_materials() {
        let store = Arc::new(TopicStore::new());
        let topic = store.reset("Biology").await;
        let scheduler = EnrichmentScheduler::new(Arc::clone(&store), Arc::new(FixedGenerator), 4);

        scheduler.submit(job_for(&topic.id, &topic.name));
        scheduler.submit(job_for(&topic.id, &topic.name));
        scheduler.wait_idle().await;

        let content = store.topic_content(&topic.id).await;
        assert_eq!(content.flashcards.len(), 2);
        assert_eq!(content.quiz_items.len(), 2);
    }

    #[tokio::test]
    async fn generator_failure_is_swallowed() {
        let store = Arc::new(TopicStore::new());
        let topic = store.reset("Biology").await;
        let scheduler =
            EnrichmentScheduler::new(Arc::clone(&store), Arc::new(FailingGenerator), 4);

        scheduler.submit(job_for(&topic.id, &topic.name));
        scheduler.wait_idle().await;

        let content = store.topic_content(&topic.id).await;
        assert!(content.flashcards.is_empty());
        assert!(content.quiz_items.is_empty());
    }

    #[tokio::test]
    async fn stale_topic_job_is_a_noop() {
        let store = Arc::new(TopicStore::new());
        let old = store.reset("First").await;
        store.reset("Second").await;
        let scheduler = EnrichmentScheduler::new(Arc::clone(&store), Arc::new(FixedGenerator), 4);

        scheduler.submit(job_for(&old.id, &old.name));
        scheduler.wait_idle().await;

        // The removed topic got nothing and the live one was untouched.
        let active = store.active().await.unwrap();
        assert!(store.topic_content(&active.id).await.flashcards.is_empty());
    }

    #[tokio::test]
    async fn wait_idle_returns_immediately_when_empty() {
        let store = Arc::new(TopicStore::new());
        let scheduler = EnrichmentScheduler::new(store, Arc::new(FixedGenerator), 4);
        scheduler.wait_idle().await;
    }
}
