//! Semantic-similarity search collaborators.
//!
//! The engine treats the collaborator as an opaque oracle: it submits a
//! free-text query and receives ranked topic ids with similarity scores,
//! already filtered to the minimum-similarity threshold. Availability
//! ("is the corpus vectorized") is queryable independently before any
//! search is attempted.

use crate::config::SemanticConfig;
use crate::error::{GlossaryError, Result};
use crate::types::{SemanticHit, TopicCategory};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Options for one semantic-search call.
#[derive(Debug, Clone, Serialize)]
pub struct SemanticSearchOptions {
    /// Cap on candidates returned.
    pub limit: usize,

    /// Optional category filter applied by the collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TopicCategory>,

    /// Minimum similarity the collaborator filters to.
    pub min_similarity: f32,
}

impl SemanticSearchOptions {
    pub fn from_config(config: &SemanticConfig, category: Option<TopicCategory>) -> Self {
        Self {
            limit: config.limit,
            category,
            min_similarity: config.min_similarity,
        }
    }
}

/// Trait for semantic-search collaborators.
#[async_trait]
pub trait SemanticProvider: Send + Sync {
    /// Whether the collaborator has a vectorized corpus to search. A
    /// failing availability check reads as unavailable.
    async fn is_available(&self) -> bool;

    /// Ranked candidates for the query, filtered and capped per `options`.
    async fn search(&self, query: &str, options: &SemanticSearchOptions)
        -> Result<Vec<SemanticHit>>;
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(flatten)]
    options: &'a SemanticSearchOptions,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SemanticHit>,
}

#[derive(Deserialize)]
struct StatusResponse {
    vectorized: bool,
}

/// Collaborator backed by a remote embedding service.
///
/// `GET {endpoint}/status` answers the availability check and
/// `POST {endpoint}/search` serves queries.
pub struct HttpSemanticProvider {
    client: Client,
    endpoint: String,
}

impl HttpSemanticProvider {
    pub fn new(config: &SemanticConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        info!(endpoint = %config.endpoint, "initialized semantic search provider");

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SemanticProvider for HttpSemanticProvider {
    async fn is_available(&self) -> bool {
        let url = format!("{}/status", self.endpoint);

        let status = async {
            let response = self.client.get(&url).send().await?;
            response.json::<StatusResponse>().await
        }
        .await;

        match status {
            Ok(status) => status.vectorized,
            Err(err) => {
                warn!(%err, "semantic availability check failed");
                false
            }
        }
    }

    async fn search(
        &self,
        query: &str,
        options: &SemanticSearchOptions,
    ) -> Result<Vec<SemanticHit>> {
        debug!(%query, limit = options.limit, "semantic search");

        let url = format!("{}/search", self.endpoint);
        let request = SearchRequest { query, options };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GlossaryError::SemanticSearchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GlossaryError::SemanticSearchFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let response: SearchResponse = response
            .json()
            .await
            .map_err(|e| GlossaryError::SemanticSearchFailed(e.to_string()))?;

        Ok(response.results)
    }
}

/// Canned-response collaborator for tests and offline runs.
pub struct MockSemanticProvider {
    hits: Vec<SemanticHit>,
    available: bool,
    fail: bool,
}

impl MockSemanticProvider {
    /// Available provider serving the given hits.
    pub fn new(hits: Vec<SemanticHit>) -> Self {
        Self {
            hits,
            available: true,
            fail: false,
        }
    }

    /// Provider whose corpus is not vectorized.
    pub fn unavailable() -> Self {
        Self {
            hits: Vec::new(),
            available: false,
            fail: false,
        }
    }

    /// Provider that reports availability but fails every search.
    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            available: true,
            fail: true,
        }
    }
}

#[async_trait]
impl SemanticProvider for MockSemanticProvider {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn search(
        &self,
        _query: &str,
        options: &SemanticSearchOptions,
    ) -> Result<Vec<SemanticHit>> {
        if self.fail {
            return Err(GlossaryError::SemanticSearchFailed(
                "mock provider failure".to_string(),
            ));
        }

        Ok(self
            .hits
            .iter()
            .filter(|hit| hit.similarity >= options.min_similarity)
            .take(options.limit)
            .cloned()
            .collect())
    }
}
