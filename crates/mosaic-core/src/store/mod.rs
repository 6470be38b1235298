//! Record store and vector index
//!
//! SQLite-backed JSON-document storage for records, plus embedding storage
//! with in-Rust cosine similarity for nearest-neighbor lookups. Both
//! surfaces are traits so the pipelines and the serving layer can be
//! exercised against fakes.

mod records;
mod schema;
pub mod vectors;

pub use schema::SqliteStore;

use crate::error::Result;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One page of records plus pagination totals
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    pub page: usize,
    pub page_size: usize,
    pub data: Vec<Record>,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Projection returned by `fetch_untagged`: id plus the content text needed
/// for classification, nothing else
#[derive(Debug, Clone)]
pub struct UntaggedRecord {
    pub id: String,
    pub content: Option<String>,
}

/// Lightweight point for map/visualization consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverPoint {
    pub id: String,
    pub coords: Vec<f64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// A nearest-neighbor hit from the vector index
#[derive(Debug, Clone)]
pub struct VectorHit {
    pub id: String,
    pub score: f32,
}

/// Record storage operations
pub trait RecordStore: Send + Sync {
    /// Insert a new record
    fn insert(&self, record: &Record) -> Result<()>;

    /// Look up a record by id
    fn get(&self, id: &str) -> Result<Option<Record>>;

    /// Look up several records, preserving request order and skipping ids
    /// that do not resolve
    fn get_many(&self, ids: &[String]) -> Result<Vec<Record>>;

    /// Offset-based pagination with an optional exact-match type filter
    fn list(&self, page: usize, page_size: usize, kind: Option<&str>) -> Result<PageResult>;

    /// Records still missing `assigned_tags`, projected to id + content text
    fn fetch_untagged(&self, limit: usize) -> Result<Vec<UntaggedRecord>>;

    /// Write tags and the tagging timestamp.
    ///
    /// Returns false when the record is missing, or when it matched but
    /// already holds equal tags (matched-but-unmodified counts as
    /// non-success).
    fn apply_tags(&self, id: &str, tags: &[String]) -> Result<bool>;

    /// Up to `limit` records carrying spatial coordinates, projected to
    /// lightweight points
    fn discover(&self, limit: usize) -> Result<Vec<DiscoverPoint>>;

    /// Total stored records
    fn count(&self) -> Result<usize>;

    /// Cheap connectivity probe for health checks
    fn ping(&self) -> bool;
}

/// Vector index operations
pub trait VectorIndex: Send + Sync {
    /// Insert or replace the embedding for a record
    fn upsert(&self, id: &str, model: &str, embedding: &[f32]) -> Result<()>;

    /// Ranked nearest neighbors for a query embedding
    fn nearest(&self, query: &[f32], n: usize) -> Result<Vec<VectorHit>>;
}

impl SqliteStore {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CACHE_DIR_NAME)
            .join("records.sqlite")
    }
}
