//! API-backed research producer.

use crate::chat_client::{ChatClient, ChatMessage};
use async_trait::async_trait;
use sage_core::agent::{ResearchFindings, ResearchProducer};
use sage_core::session::SourceRef;
use sage_core::{Result, SageError};
use serde::Deserialize;

const RESEARCH_SYSTEM_PROMPT: &str = "\
You are a research assistant supporting a tutoring session. Given a query, \
produce a concise, factual briefing a tutor can ground an answer in, and \
list the sources you drew on. Respond with a strict JSON object: \
{\"text\": string, \"sources\": [{\"title\": string, \"locator\": string}]}. \
Locators should be URLs where possible.";

/// Producer that asks the chat model for a web-grounded briefing.
pub struct ApiResearchProducer {
    client: ChatClient,
}

#[derive(Deserialize)]
struct ResearchReply {
    text: String,
    #[serde(default)]
    sources: Vec<SourceReply>,
}

#[derive(Deserialize)]
struct SourceReply {
    title: String,
    locator: String,
}

impl ApiResearchProducer {
    /// Creates a research producer over the shared chat client.
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResearchProducer for ApiResearchProducer {
    async fn research(&self, query: &str) -> Result<ResearchFindings> {
        let messages = [
            ChatMessage::system(RESEARCH_SYSTEM_PROMPT),
            ChatMessage::user(query.to_string()),
        ];

        let reply = self
            .client
            .complete(&messages, true)
            .await
            .map_err(|e| SageError::producer("research", e.to_string()))?;

        let parsed: ResearchReply = serde_json::from_str(&reply)
            .map_err(|e| SageError::producer("research", format!("Malformed briefing: {e}")))?;

        Ok(ResearchFindings {
            text: parsed.text,
            sources: parsed
                .sources
                .into_iter()
                .map(|s| SourceRef {
                    title: s.title,
                    locator: s.locator,
                })
                .collect(),
        })
    }
}
