//! In-memory topic entity store.
//!
//! Holds every topic created during the session plus the active-topic
//! pointer. The store is deliberately forgiving: mutations addressed to an
//! unknown or stale id are silent no-ops and reads return empty defaults,
//! so detached callbacks racing a session reset can never fail a turn.

use super::model::{ExamQuestion, Flashcard, QuizItem, Topic, TopicContent};
use crate::session::ConversationMessage;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Separator between appended knowledge-base entries.
const KNOWLEDGE_SEPARATOR: &str = "\n";

#[derive(Default)]
struct StoreInner {
    /// Topics by id.
    topics: HashMap<String, Topic>,
    /// Topic ids in insertion order (main topic is always inserted first
    /// after a reset; creation order doubles as creation-time order).
    order: Vec<String>,
    /// Lowercased name -> id, for constant-time case-insensitive dedup.
    name_index: HashMap<String, String>,
    /// Id of the currently active topic, if any.
    active_id: Option<String>,
}

/// Entity store for topics and the active-topic pointer.
///
/// All state lives behind a single `RwLock`; the write lock makes
/// `create_or_get` atomic (check-then-create cannot race) and serializes
/// collection mutation per topic, so concurrent turns and enrichment jobs
/// cannot interleave appends.
#[derive(Default)]
pub struct TopicStore {
    inner: RwLock<StoreInner>,
}

impl TopicStore {
    /// Creates an empty store with no topics and no active pointer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all topics, creates the session's main topic, and makes it
    /// active. Always succeeds.
    ///
    /// # Arguments
    ///
    /// * `main_name` - Name for the session's anchor topic
    ///
    /// # Returns
    ///
    /// A clone of the newly created main topic.
    pub async fn reset(&self, main_name: &str) -> Topic {
        let mut inner = self.inner.write().await;
        *inner = StoreInner::default();

        let topic = Topic::new(main_name, true);
        inner.name_index.insert(main_name.to_lowercase(), topic.id.clone());
        inner.order.push(topic.id.clone());
        inner.active_id = Some(topic.id.clone());
        inner.topics.insert(topic.id.clone(), topic.clone());
        topic
    }

    /// Returns the topic with the given name, creating it if absent.
    ///
    /// Lookup is case-insensitive and first creation wins: a later request
    /// for an equivalent name returns the existing entity, never a
    /// duplicate. The whole check-then-create runs under the write lock.
    ///
    /// # Arguments
    ///
    /// * `name` - Human-readable topic label
    /// * `is_main` - Whether a newly created topic becomes the anchor;
    ///   ignored when the topic already exists
    pub async fn create_or_get(&self, name: &str, is_main: bool) -> Topic {
        let mut inner = self.inner.write().await;
        let key = name.to_lowercase();

        if let Some(id) = inner.name_index.get(&key) {
            // Unwrap is safe: the index only holds ids of stored topics.
            return inner.topics.get(id).cloned().unwrap();
        }

        let topic = Topic::new(name, is_main);
        inner.name_index.insert(key, topic.id.clone());
        inner.order.push(topic.id.clone());
        inner.topics.insert(topic.id.clone(), topic.clone());
        topic
    }

    /// Sets the active pointer iff `id` refers to a stored topic.
    ///
    /// A stale id is silently ignored; this tolerates racing callbacks that
    /// reference a topic a concurrent reset removed.
    pub async fn set_active(&self, id: &str) {
        let mut inner = self.inner.write().await;
        if inner.topics.contains_key(id) {
            inner.active_id = Some(id.to_string());
        }
    }

    /// Returns the currently active topic, if any.
    pub async fn active(&self) -> Option<Topic> {
        let inner = self.inner.read().await;
        inner
            .active_id
            .as_ref()
            .and_then(|id| inner.topics.get(id))
            .cloned()
    }

    /// Returns the topic with the given id, if stored.
    pub async fn get(&self, id: &str) -> Option<Topic> {
        self.inner.read().await.topics.get(id).cloned()
    }

    /// Case-insensitive exact name lookup.
    pub async fn get_by_name(&self, name: &str) -> Option<Topic> {
        let inner = self.inner.read().await;
        inner
            .name_index
            .get(&name.to_lowercase())
            .and_then(|id| inner.topics.get(id))
            .cloned()
    }

    /// Returns all topics, main topic first, then by ascending creation
    /// time. The ordering is stable and deterministic.
    pub async fn list(&self) -> Vec<Topic> {
        let inner = self.inner.read().await;
        let mut topics: Vec<Topic> = inner
            .order
            .iter()
            .filter_map(|id| inner.topics.get(id))
            .cloned()
            .collect();
        // Insertion order already is creation order; a stable sort just
        // floats the main topic to the front.
        topics.sort_by_key(|t| !t.is_main);
        topics
    }

    /// Appends a turn record to a topic's history. No-op on a missing id.
    pub async fn append_message(&self, id: &str, message: ConversationMessage) {
        let mut inner = self.inner.write().await;
        if let Some(topic) = inner.topics.get_mut(id) {
            topic.messages.push(message);
        }
    }

    /// Appends a knowledge summary to a topic. No-op on a missing id.
    ///
    /// Entries are newline-delimited; the knowledge base never shrinks
    /// within a session.
    pub async fn append_knowledge(&self, id: &str, text: &str) {
        let mut inner = self.inner.write().await;
        if let Some(topic) = inner.topics.get_mut(id) {
            if !topic.knowledge_base.is_empty() {
                topic.knowledge_base.push_str(KNOWLEDGE_SEPARATOR);
            }
            topic.knowledge_base.push_str(text);
        }
    }

    /// Appends flashcards to a topic. No deduplication; repeated generation
    /// may yield overlapping entries by design. No-op on a missing id.
    pub async fn add_flashcards(&self, id: &str, cards: Vec<Flashcard>) {
        let mut inner = self.inner.write().await;
        if let Some(topic) = inner.topics.get_mut(id) {
            topic.flashcards.extend(cards);
        }
    }

    /// Appends quiz items to a topic. No-op on a missing id.
    pub async fn add_quizzes(&self, id: &str, items: Vec<QuizItem>) {
        let mut inner = self.inner.write().await;
        if let Some(topic) = inner.topics.get_mut(id) {
            topic.quiz_items.extend(items);
        }
    }

    /// Replaces a topic's exam content wholesale. No-op on a missing id.
    pub async fn set_exam_questions(&self, id: &str, questions: Vec<ExamQuestion>) {
        let mut inner = self.inner.write().await;
        if let Some(topic) = inner.topics.get_mut(id) {
            topic.exam_questions = questions;
        }
    }

    /// Returns a topic's exam content; empty for a missing id.
    pub async fn exam_questions(&self, id: &str) -> Vec<ExamQuestion> {
        self.inner
            .read()
            .await
            .topics
            .get(id)
            .map(|t| t.exam_questions.clone())
            .unwrap_or_default()
    }

    /// Replaces a topic's notebook content (last write wins). No-op on a
    /// missing id.
    pub async fn set_notebook_content(&self, id: &str, text: &str) {
        let mut inner = self.inner.write().await;
        if let Some(topic) = inner.topics.get_mut(id) {
            topic.notebook_content = Some(text.to_string());
        }
    }

    /// Returns a topic's knowledge base; empty for a missing id.
    pub async fn knowledge_base(&self, id: &str) -> String {
        self.inner
            .read()
            .await
            .topics
            .get(id)
            .map(|t| t.knowledge_base.clone())
            .unwrap_or_default()
    }

    /// Returns the read-only bundle of a topic's study artifacts; the
    /// default (all-empty) bundle for a missing id.
    pub async fn topic_content(&self, id: &str) -> TopicContent {
        self.inner
            .read()
            .await
            .topics
            .get(id)
            .map(|t| TopicContent {
                flashcards: t.flashcards.clone(),
                quiz_items: t.quiz_items.clone(),
                exam_questions: t.exam_questions.clone(),
                notebook_content: t.notebook_content.clone(),
                knowledge_base: t.knowledge_base.clone(),
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ConversationMessage, MessageRole};

    #[tokio::test]
    async fn create_or_get_is_case_insensitive() {
        let store = TopicStore::new();
        store.reset("Main").await;

        let first = store.create_or_get("Quantum Physics", false).await;
        let second = store.create_or_get("quantum physics", false).await;

        assert_eq!(first.id, second.id);
        // Main topic plus exactly one quantum physics topic.
        assert_eq!(store.list().await.len(), 2);
        // First creation wins on the stored label.
        assert_eq!(second.name, "Quantum Physics");
    }

    #[tokio::test]
    async fn reset_creates_single_active_main_topic() {
        let store = TopicStore::new();
        store.create_or_get("Leftover", false).await;

        store.reset("Biology").await;

        let topics = store.list().await;
        assert_eq!(topics.len(), 1);
        assert!(topics[0].is_main);
        assert_eq!(topics[0].name, "Biology");
        assert_eq!(store.active().await.unwrap().name, "Biology");
    }

    #[tokio::test]
    async fn list_orders_main_first_then_creation_order() {
        let store = TopicStore::new();
        store.reset("A").await;
        store.create_or_get("C", false).await;
        store.create_or_get("B", false).await;

        let names: Vec<String> = store.list().await.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[tokio::test]
    async fn knowledge_base_is_ordered_concatenation() {
        let store = TopicStore::new();
        let main = store.reset("Chemistry").await;

        store.append_knowledge(&main.id, "s1").await;
        store.append_knowledge(&main.id, "s2").await;
        store.append_knowledge(&main.id, "s3").await;

        assert_eq!(store.knowledge_base(&main.id).await, "s1\ns2\ns3");
    }

    #[tokio::test]
    async fn stale_id_operations_are_noops() {
        let store = TopicStore::new();
        let old = store.reset("First").await;
        store.reset("Second").await;

        // Mutations against the removed topic do nothing and do not fail.
        store
            .append_message(&old.id, ConversationMessage::new(MessageRole::Learner, "hi"))
            .await;
        store.append_knowledge(&old.id, "gone").await;
        store.set_active(&old.id).await;

        assert_eq!(store.active().await.unwrap().name, "Second");
        assert_eq!(store.knowledge_base(&old.id).await, "");
        assert_eq!(store.topic_content(&old.id).await, TopicContent::default());
    }

    #[tokio::test]
    async fn exam_questions_are_replaced_wholesale() {
        let store = TopicStore::new();
        let main = store.reset("History").await;

        store
            .set_exam_questions(
                &main.id,
                vec![ExamQuestion {
                    prompt: "q1".to_string(),
                    answer: "a1".to_string(),
                }],
            )
            .await;
        store
            .set_exam_questions(
                &main.id,
                vec![
                    ExamQuestion {
                        prompt: "q2".to_string(),
                        answer: "a2".to_string(),
                    },
                    ExamQuestion {
                        prompt: "q3".to_string(),
                        answer: "a3".to_string(),
                    },
                ],
            )
            .await;

        let questions = store.exam_questions(&main.id).await;
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].prompt, "q2");
    }

    #[tokio::test]
    async fn notebook_content_last_write_wins() {
        let store = TopicStore::new();
        let main = store.reset("Latin").await;

        store.set_notebook_content(&main.id, "first notes").await;
        store.set_notebook_content(&main.id, "second notes").await;

        let content = store.topic_content(&main.id).await;
        assert_eq!(content.notebook_content.as_deref(), Some("second notes"));
    }

    #[tokio::test]
    async fn flashcards_accumulate_without_dedup() {
        let store = TopicStore::new();
        let main = store.reset("Geometry").await;
        let card = Flashcard {
            front: "f".to_string(),
            back: "b".to_string(),
        };

        store.add_flashcards(&main.id, vec![card.clone()]).await;
        store.add_flashcards(&main.id, vec![card]).await;

        assert_eq!(store.topic_content(&main.id).await.flashcards.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_create_or_get_yields_one_topic() {
        use std::sync::Arc;

        let store = Arc::new(TopicStore::new());
        store.reset("Main").await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create_or_get("Astronomy", false).await.id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.list().await.len(), 2);
    }
}
