//! The canonical article/record model
//!
//! Records are produced by the content pipeline, mutated exactly once by the
//! tagging pipeline, and read by the serving layer. The discriminator field
//! (`type`) is modelled as a tagged union so that variant-specific fields and
//! the similarity-query derivation are dispatched by exhaustive match instead
//! of ad hoc field presence checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Version stamp written into `scraper_metadata.agent_version`
pub const AGENT_VERSION: &str = "1.0.0";

/// Record variant over the `type` discriminator.
///
/// `Model` records carry their display name and abstract as top-level
/// document fields (`Model`, `Abstract`), which the flattened serde
/// representation preserves. Documents with a discriminator this crate does
/// not know deserialize as `Unknown` rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RecordKind {
    Article,
    Model {
        #[serde(rename = "Model")]
        name: String,
        #[serde(rename = "Abstract", default)]
        summary: String,
    },
    #[serde(rename = "AI Tool")]
    AiTool,
    #[serde(other)]
    Unknown,
}

impl RecordKind {
    /// Discriminator string as stored in the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Model { .. } => "Model",
            Self::AiTool => "AI Tool",
            Self::Unknown => "Unknown",
        }
    }

    /// Model display name, if this is a `Model` record
    pub fn model_name(&self) -> Option<&str> {
        match self {
            Self::Model { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Where a record came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSource {
    /// Platform display name (the source domain)
    pub platform: String,
    /// Origin URL
    pub url: String,
    /// When the hit was retrieved
    pub scrape_timestamp: String,
}

/// Article metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    /// Immutable after first persist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Bumped on content or tag mutation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Article content, enriched in place by the generation stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordContent {
    /// Raw snippet from the search hit
    #[serde(default)]
    pub description: String,
    /// Generated long-form text
    #[serde(default)]
    pub article_text: String,
    /// Generated abstract
    #[serde(default, rename = "abstract")]
    pub summary: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Diagnostics carried alongside the content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScraperMetadata {
    pub agent_version: String,
    pub extraction_confidence: f64,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Default for ScraperMetadata {
    fn default() -> Self {
        Self {
            agent_version: AGENT_VERSION.to_string(),
            extraction_confidence: 0.8,
            errors: Vec::new(),
        }
    }
}

/// The canonical article/document record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Content-derived stable identifier
    pub id: String,

    #[serde(flatten)]
    pub kind: RecordKind,

    pub source: RecordSource,
    pub metadata: RecordMetadata,
    pub content: RecordContent,

    /// Raw text from the search hit, kept for re-generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    pub scraper_metadata: ScraperMetadata,

    /// Absence is the sentinel for "not yet tagged"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_tags: Option<Vec<String>>,

    /// Set exactly when `assigned_tags` is first written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags_assigned_at: Option<DateTime<Utc>>,

    /// Spatial projection data, populated externally; stripped from
    /// single-record responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Vec<f64>>,
}

impl Record {
    /// Derive the textual query used for "similar items" lookups.
    ///
    /// Each variant declares its own field mapping; an `Unknown`
    /// discriminator derives the empty query, which yields an empty
    /// similarity result rather than an error.
    pub fn similarity_query(&self) -> String {
        match &self.kind {
            RecordKind::Article | RecordKind::AiTool => {
                format!("{} {}", self.metadata.title, self.content.description)
            }
            RecordKind::Model { name, summary } => format!("{} {}", name, summary),
            RecordKind::Unknown => String::new(),
        }
    }

    /// Text used for classification and embedding: the generated article,
    /// falling back to the raw description.
    pub fn content_text(&self) -> &str {
        if self.content.article_text.is_empty() {
            &self.content.description
        } else {
            &self.content.article_text
        }
    }

    /// Copy with internal geometry stripped, for API responses
    pub fn without_coords(mut self) -> Self {
        self.coords = None;
        self
    }
}

/// Derive a record id from a hit's URL and title plus the current wall-clock
/// time.
///
/// The timestamp makes ids non-idempotent across repeated structuring of the
/// same hit; re-scraping a source URL produces a new record each time.
pub fn record_id(url: &str, title: &str) -> String {
    record_id_at(url, title, &Utc::now().to_rfc3339())
}

/// Deterministic variant used by tests
pub fn record_id_at(url: &str, title: &str, timestamp: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(title.as_bytes());
    hasher.update(timestamp.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..32].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, description: &str) -> Record {
        Record {
            id: "abc123".to_string(),
            kind: RecordKind::Article,
            source: RecordSource::default(),
            metadata: RecordMetadata {
                title: title.to_string(),
                ..Default::default()
            },
            content: RecordContent {
                description: description.to_string(),
                ..Default::default()
            },
            raw_text: None,
            scraper_metadata: ScraperMetadata::default(),
            assigned_tags: None,
            tags_assigned_at: None,
            coords: None,
        }
    }

    #[test]
    fn model_variant_serializes_top_level_fields() {
        let mut record = article("ignored", "ignored");
        record.kind = RecordKind::Model {
            name: "Llama 3".to_string(),
            summary: "An open LLM".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Model");
        assert_eq!(json["Model"], "Llama 3");
        assert_eq!(json["Abstract"], "An open LLM");
    }

    #[test]
    fn unknown_discriminator_deserializes_and_derives_empty_query() {
        let json = serde_json::json!({
            "id": "x1",
            "type": "Dataset",
            "source": {"platform": "", "url": "", "scrape_timestamp": ""},
            "metadata": {"title": "t", "authors": [], "published_date": null},
            "content": {"description": "d", "article_text": "", "abstract": "", "keywords": []},
            "scraper_metadata": {"agent_version": "1.0.0", "extraction_confidence": 0.8, "errors": []}
        });

        let record: Record = serde_json::from_value(json).unwrap();
        assert_eq!(record.kind, RecordKind::Unknown);
        assert_eq!(record.similarity_query(), "");
    }

    #[test]
    fn similarity_query_per_variant() {
        let record = article("AlphaFold", "protein structures");
        assert_eq!(record.similarity_query(), "AlphaFold protein structures");

        let mut tool = article("Cursor", "an AI editor");
        tool.kind = RecordKind::AiTool;
        assert_eq!(tool.similarity_query(), "Cursor an AI editor");

        let mut model = article("unused", "unused");
        model.kind = RecordKind::Model {
            name: "GPT-4".to_string(),
            summary: "multimodal".to_string(),
        };
        assert_eq!(model.similarity_query(), "GPT-4 multimodal");
    }

    #[test]
    fn untagged_sentinel_is_absent_field() {
        let record = article("t", "d");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("assigned_tags").is_none());
        assert!(json.get("tags_assigned_at").is_none());
    }

    #[test]
    fn record_id_is_stable_for_fixed_inputs() {
        let a = record_id_at("https://x.com/a", "Title", "2026-01-01T00:00:00Z");
        let b = record_id_at("https://x.com/a", "Title", "2026-01-01T00:00:00Z");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn record_id_varies_with_time_component() {
        let a = record_id_at("https://x.com/a", "Title", "2026-01-01T00:00:00Z");
        let b = record_id_at("https://x.com/a", "Title", "2026-01-01T00:00:01Z");
        assert_ne!(a, b);
    }

    #[test]
    fn without_coords_strips_geometry() {
        let mut record = article("t", "d");
        record.coords = Some(vec![1.0, 2.0]);
        assert!(record.without_coords().coords.is_none());
    }
}
