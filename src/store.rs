//! Document-store access for the topic and clip corpora.
//!
//! The store is an external collaborator: a managed document database
//! exposed through a JSON REST facade. This module only reads the fields
//! the search core needs and imposes no further schema.

use crate::config::StoreConfig;
use crate::error::{GlossaryError, Result};
use crate::types::{Clip, Topic, TopicCategory, UsageStats};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Read access to a document store organized as collections of JSON
/// records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in a named collection, as `(id, record)` pairs.
    async fn list_collection(&self, collection: &str) -> Result<Vec<(String, Value)>>;

    /// All documents in a named sub-collection under one parent document.
    async fn list_subcollection(
        &self,
        collection: &str,
        parent_id: &str,
        sub: &str,
    ) -> Result<Vec<(String, Value)>>;
}

/// Document shape served by the REST facade.
#[derive(Deserialize)]
struct RestDocument {
    id: String,
    #[serde(default)]
    fields: Value,
}

/// Document store backed by a JSON REST facade.
///
/// Collections are served at `GET {base}/{collection}` and sub-collections
/// at `GET {base}/{collection}/{parent_id}/{sub}`, both as arrays of
/// `{id, fields}` documents. Every transport failure maps to
/// [`GlossaryError::CorpusUnavailable`].
pub struct RestDocumentStore {
    client: Client,
    base_url: String,
}

impl RestDocumentStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        info!(base_url = %config.base_url, "initialized REST document store");

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_documents(&self, url: String) -> Result<Vec<(String, Value)>> {
        let unavailable = |detail: String| GlossaryError::CorpusUnavailable(detail);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(format!("{url}: {e}")))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("{url}: HTTP {}", response.status())));
        }

        let documents: Vec<RestDocument> = response
            .json()
            .await
            .map_err(|e| unavailable(format!("{url}: {e}")))?;

        Ok(documents.into_iter().map(|d| (d.id, d.fields)).collect())
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn list_collection(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        self.get_documents(format!("{}/{collection}", self.base_url)).await
    }

    async fn list_subcollection(
        &self,
        collection: &str,
        parent_id: &str,
        sub: &str,
    ) -> Result<Vec<(String, Value)>> {
        self.get_documents(format!("{}/{collection}/{parent_id}/{sub}", self.base_url))
            .await
    }
}

/// In-memory store for tests and fixtures.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<(String, Value)>>,
    subcollections: HashMap<(String, String, String), Vec<(String, Value)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collection: &str, id: &str, record: Value) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push((id.to_string(), record));
    }

    pub fn insert_sub(
        &mut self,
        collection: &str,
        parent_id: &str,
        sub: &str,
        id: &str,
        record: Value,
    ) {
        self.subcollections
            .entry((collection.to_string(), parent_id.to_string(), sub.to_string()))
            .or_default()
            .push((id.to_string(), record));
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_collection(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }

    async fn list_subcollection(
        &self,
        collection: &str,
        parent_id: &str,
        sub: &str,
    ) -> Result<Vec<(String, Value)>> {
        let key = (collection.to_string(), parent_id.to_string(), sub.to_string());
        Ok(self.subcollections.get(&key).cloned().unwrap_or_default())
    }
}

/// Read the topic corpus. Records without a usable keyword are skipped
/// with a warning; statistics are zeroed until the caller attaches them.
pub async fn fetch_topics(store: &dyn DocumentStore, config: &StoreConfig) -> Result<Vec<Topic>> {
    let records = store.list_collection(&config.topics_collection).await?;

    let mut topics = Vec::with_capacity(records.len());
    for (id, record) in records {
        // Older topic documents use `eventTopic` for the display name.
        let Some(keyword) = record
            .get("keyword")
            .or_else(|| record.get("eventTopic"))
            .and_then(Value::as_str)
        else {
            warn!(id = %id, "topic record has no keyword, skipping");
            continue;
        };

        let category = record
            .get("category")
            .and_then(Value::as_str)
            .map(TopicCategory::parse)
            .unwrap_or(TopicCategory::Other);

        let importance_score = record
            .get("importanceScore")
            .and_then(Value::as_i64)
            .unwrap_or(0);

        topics.push(Topic {
            id,
            keyword: keyword.to_string(),
            category,
            importance_score,
            stats: UsageStats::default(),
        });
    }

    debug!(count = topics.len(), "fetched topic corpus");
    Ok(topics)
}

/// Read every clip across all interviews, tagging each with its parent
/// interview id. A malformed clip record is skipped, never fatal.
pub async fn fetch_clips(store: &dyn DocumentStore, config: &StoreConfig) -> Result<Vec<Clip>> {
    let interviews = store.list_collection(&config.interviews_collection).await?;

    let mut clips = Vec::new();
    for (interview_id, _) in interviews {
        let records = store
            .list_subcollection(
                &config.interviews_collection,
                &interview_id,
                &config.clips_subcollection,
            )
            .await?;

        for (clip_id, record) in records {
            match serde_json::from_value::<Clip>(record) {
                Ok(mut clip) => {
                    clip.interview_id = interview_id.clone();
                    clips.push(clip);
                }
                Err(err) => {
                    warn!(interview = %interview_id, clip = %clip_id, %err, "skipping malformed clip record");
                }
            }
        }
    }

    debug!(count = clips.len(), "fetched clip corpus");
    Ok(clips)
}
