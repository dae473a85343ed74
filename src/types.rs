//! Core types for glossary search.

use serde::{Deserialize, Serialize};

/// Topic identifier as assigned by the document store.
pub type TopicId = String;

/// Category assigned to a glossary topic by curation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicCategory {
    Concept,
    Place,
    Person,
    Event,
    Org,
    Legal,
    Other,
}

impl TopicCategory {
    /// Parse a stored category string. Unknown values map to `Other`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "concept" => Self::Concept,
            "place" => Self::Place,
            "person" => Self::Person,
            "event" => Self::Event,
            "org" => Self::Org,
            "legal" => Self::Legal,
            _ => Self::Other,
        }
    }
}

/// Aggregated usage statistics for one normalized keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Number of distinct clips tagged with the keyword.
    pub clip_count: u32,
    /// Number of distinct parent interviews those clips belong to.
    pub interview_count: u32,
    /// Total clip duration in seconds, rounded to the nearest integer.
    pub total_length_seconds: u64,
}

/// A named concept in the glossary, the unit being searched and ranked.
///
/// Loaded once per session from the topic corpus; statistics are attached
/// at load time and the record is immutable until the next cache refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    /// Display/lookup name. Case is preserved for display and lower-cased
    /// for matching.
    pub keyword: String,
    pub category: TopicCategory,
    /// Curation signal, used only for the no-search default ordering.
    pub importance_score: i64,
    #[serde(default)]
    pub stats: UsageStats,
}

/// The `keywords` field of a clip arrives from upstream either as a
/// comma-delimited string or as an explicit list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeywordField {
    List(Vec<String>),
    Delimited(String),
}

impl Default for KeywordField {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl KeywordField {
    /// Canonical form: lower-cased, trimmed, de-duplicated tokens with
    /// empties discarded.
    pub fn normalize(&self) -> Vec<String> {
        let raw: Vec<String> = match self {
            Self::List(tokens) => tokens.clone(),
            Self::Delimited(joined) => joined.split(',').map(str::to_string).collect(),
        };

        let mut tokens = Vec::new();
        for token in raw {
            let token = token.trim().to_lowercase();
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        tokens
    }
}

/// A timestamped excerpt belonging to a parent interview.
#[derive(Debug, Clone, Deserialize)]
pub struct Clip {
    /// Parent interview id, attached while reading the sub-collection.
    #[serde(default)]
    pub interview_id: String,
    #[serde(default)]
    pub keywords: KeywordField,
    /// Range of two time offsets, e.g. `"[00:10] - 00:40"`.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A ranked candidate returned by the semantic collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticHit {
    pub topic_id: TopicId,
    pub similarity: f32,
}

/// A per-query result for one topic.
///
/// Invariant: at least one of `has_keyword_match` / `has_semantic_match`
/// is true — no result exists without a signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicMatch {
    pub topic_id: TopicId,
    /// Display name, also the deterministic tie-break for equal scores.
    pub keyword: String,
    pub score: f32,
    pub has_keyword_match: bool,
    pub has_semantic_match: bool,
    /// Present only when a semantic match exists.
    pub similarity: Option<f32>,
}

/// Merged results partitioned into presentation tiers, ordered by score
/// within each tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    /// Topics the keyword stage matched.
    pub exact_matches: Vec<TopicMatch>,
    /// Topics only the semantic stage matched.
    pub related_matches: Vec<TopicMatch>,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.exact_matches.len() + self.related_matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact_matches.is_empty() && self.related_matches.is_empty()
    }
}

/// Ordering for the no-query browsing path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Alphabetical,
    ClipCount,
    InterviewCount,
    Importance,
}
