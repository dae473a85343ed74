//! Topic-glossary search core for an oral-history clip archive.
//!
//! `glossa` answers one question well: given a free-text query, which
//! glossary topics should an archive visitor see, in what order, and
//! with what usage statistics? It combines two signals over a corpus of
//! curated topics:
//!
//! - **Keyword stage**: synchronous substring matching against topic
//!   keywords, with exact > prefix > substring score tiers
//! - **Semantic stage**: an external similarity collaborator whose
//!   candidates boost or extend the keyword results
//!
//! Results are partitioned into exact matches (keyword-confirmed) and
//! related matches (semantic-only). The semantic stage is strictly an
//! enhancement: when the collaborator is down, slow, or not yet
//! vectorized, searches degrade to keyword-only results without error.
//!
//! # Architecture
//!
//! - [`store`]: document-store access plus corpus fetch routines
//! - [`stats`]: usage-statistics aggregation over clip timestamp ranges
//! - [`semantic`]: the similarity collaborator trait and its providers
//! - [`ranking`]: scoring, merging, partitioning, browse ordering
//! - [`cache`]: corpus and query-result caches
//! - [`search`]: the [`GlossaryEngine`] orchestrating all of the above
//!
//! # Example
//!
//! ```no_run
//! use glossa::{GlossaryConfig, GlossaryEngine, HttpSemanticProvider, RestDocumentStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GlossaryConfig::default();
//! let store = Arc::new(RestDocumentStore::new(&config.store)?);
//! let semantic = Arc::new(HttpSemanticProvider::new(&config.semantic)?);
//!
//! let engine = GlossaryEngine::new(config, store, semantic);
//! let results = engine.search("selma", None).await?;
//!
//! for topic in &results.exact_matches {
//!     println!("{} ({:.2})", topic.keyword, topic.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod ranking;
pub mod search;
pub mod semantic;
pub mod stats;
pub mod store;
pub mod types;

pub use config::{CacheConfig, GlossaryConfig, SearchConfig, SemanticConfig, StoreConfig};
pub use error::{GlossaryError, Result};
pub use search::GlossaryEngine;
pub use semantic::{HttpSemanticProvider, MockSemanticProvider, SemanticProvider, SemanticSearchOptions};
pub use store::{DocumentStore, MemoryStore, RestDocumentStore};
pub use types::{
    Clip, SearchResults, SemanticHit, SortKey, Topic, TopicCategory, TopicMatch, UsageStats,
};

/// Commonly used types for working with the glossary search core.
pub mod prelude {
    pub use crate::config::GlossaryConfig;
    pub use crate::error::{GlossaryError, Result};
    pub use crate::search::GlossaryEngine;
    pub use crate::semantic::SemanticProvider;
    pub use crate::store::DocumentStore;
    pub use crate::types::{SearchResults, SortKey, Topic, TopicCategory, TopicMatch, UsageStats};
}
