//! File analyses and saved conversation contexts, persisted per assistant.
//!
//! DESIGN
//! ======
//! Both lists are newest-first. The chat session produces records; the
//! assistant page owns an [`InsightsState`] and files them here through
//! callbacks, so the session never touches storage itself.

#[cfg(test)]
#[path = "insights_test.rs"]
mod insights_test;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::analytics::{analyze_sentiment, extract_topics, lead_score};
use crate::state::chat::{ChatMessage, FileType};
use crate::util::ids::generate_id;
use crate::util::storage::{Persisted, StorageBackend, StorageError};

const ANALYSES_KEY_PREFIX: &str = "ai-assistant-file-analyses";
const CONTEXTS_KEY_PREFIX: &str = "ai-assistant-conversation-contexts";

#[must_use]
pub fn analyses_key(assistant_id: &str) -> String {
    format!("{ANALYSES_KEY_PREFIX}-{assistant_id}")
}

#[must_use]
pub fn contexts_key(assistant_id: &str) -> String {
    format!("{CONTEXTS_KEY_PREFIX}-{assistant_id}")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positivo",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negativo",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Metadata produced for one uploaded file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub id: String,
    pub file_id: String,
    pub file_name: String,
    pub file_type: FileType,
    pub analyzed_at: DateTime<Utc>,
    pub summary: String,
    pub key_points: Vec<String>,
    pub entities: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// A saved conversation snapshot with derived analytics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    pub id: String,
    pub assistant_id: String,
    pub assistant_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
    pub file_analyses: Vec<FileAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_score: Option<u8>,
}

impl ConversationContext {
    /// Snapshot `messages` and `analyses` for the given assistant.
    #[must_use]
    pub fn capture(
        assistant_id: &str,
        assistant_name: &str,
        messages: Vec<ChatMessage>,
        analyses: Vec<FileAnalysis>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id("ctx"),
            assistant_id: assistant_id.to_owned(),
            assistant_name: assistant_name.to_owned(),
            created_at: now,
            updated_at: now,
            topics: extract_topics(&messages),
            sentiment: analyze_sentiment(&messages),
            lead_score: Some(lead_score(&messages)),
            summary: None,
            messages,
            file_analyses: analyses,
        }
    }
}

/// Per-assistant analysis and context history.
#[derive(Clone, Debug, PartialEq)]
pub struct InsightsState {
    analyses: Persisted<Vec<FileAnalysis>>,
    contexts: Persisted<Vec<ConversationContext>>,
}

impl InsightsState {
    #[must_use]
    pub fn new(assistant_id: &str) -> Self {
        Self {
            analyses: Persisted::new(analyses_key(assistant_id), Vec::new()),
            contexts: Persisted::new(contexts_key(assistant_id), Vec::new()),
        }
    }

    pub fn hydrate(&mut self, backend: &dyn StorageBackend) {
        self.analyses.hydrate(backend);
        self.contexts.hydrate(backend);
    }

    #[must_use]
    pub fn loaded(&self) -> bool {
        self.analyses.loaded() && self.contexts.loaded()
    }

    #[must_use]
    pub fn analyses(&self) -> &[FileAnalysis] {
        self.analyses.get()
    }

    #[must_use]
    pub fn contexts(&self) -> &[ConversationContext] {
        self.contexts.get()
    }

    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn add_analysis(&mut self, backend: &dyn StorageBackend, analysis: FileAnalysis) -> Result<(), StorageError> {
        self.analyses.update(backend, |list| list.insert(0, analysis))
    }

    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn add_context(&mut self, backend: &dyn StorageBackend, context: ConversationContext) -> Result<(), StorageError> {
        log::info!("saving conversation context {} ({} messages)", context.id, context.messages.len());
        self.contexts.update(backend, |list| list.insert(0, context))
    }

    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn delete_analysis(&mut self, backend: &dyn StorageBackend, id: &str) -> Result<(), StorageError> {
        self.analyses.update(backend, |list| list.retain(|a| a.id != id))
    }

    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn delete_context(&mut self, backend: &dyn StorageBackend, id: &str) -> Result<(), StorageError> {
        self.contexts.update(backend, |list| list.retain(|c| c.id != id))
    }

    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn clear_analyses(&mut self, backend: &dyn StorageBackend) -> Result<(), StorageError> {
        self.analyses.set(backend, Vec::new())
    }

    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn clear_contexts(&mut self, backend: &dyn StorageBackend) -> Result<(), StorageError> {
        self.contexts.set(backend, Vec::new())
    }
}
