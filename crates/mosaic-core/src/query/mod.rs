//! Query/serving layer
//!
//! Read-side operations over the record store and the vector index:
//! paginated listing, single-record lookup, similarity search (embed ->
//! nearest-neighbor -> hydrate), record-derived similarity, and the
//! discover projection. Missing records are structured results, never
//! errors.

use crate::error::{MosaicError, Result};
use crate::llm::LlmClient;
use crate::record::Record;
use crate::store::{DiscoverPoint, PageResult, RecordStore, VectorIndex};
use std::sync::Arc;

/// Maximum points returned by the discover projection
pub const DISCOVER_LIMIT: usize = 200;

/// Default neighbor count for record-derived similarity
pub const SIMILAR_DEFAULT_N: usize = 6;

/// Structured lookup result
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(Record),
    NotFound,
}

/// The read-side serving surface
pub struct ServingLayer {
    store: Arc<dyn RecordStore>,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn LlmClient>,
}

impl ServingLayer {
    pub fn new(
        store: Arc<dyn RecordStore>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            store,
            index,
            embedder,
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Single-record lookup with internal geometry stripped
    pub fn get_by_id(&self, id: &str) -> Result<Lookup> {
        match self.store.get(id)? {
            Some(record) => Ok(Lookup::Found(record.without_coords())),
            None => Ok(Lookup::NotFound),
        }
    }

    /// Offset-paginated listing with an optional exact-match type filter.
    ///
    /// The literal filter value "All" is a sentinel for no filter.
    pub fn list(
        &self,
        page: usize,
        page_size: usize,
        kind: Option<&str>,
    ) -> Result<PageResult> {
        if page < 1 {
            return Err(MosaicError::InvalidInput(
                "page must be >= 1".to_string(),
            ));
        }
        if !(1..=500).contains(&page_size) {
            return Err(MosaicError::InvalidInput(
                "page_size must be between 1 and 500".to_string(),
            ));
        }

        let kind = kind.filter(|k| !k.is_empty() && *k != "All");
        self.store.list(page, page_size, kind)
    }

    /// Embed a text query, find nearest neighbors, hydrate records.
    ///
    /// Vector hits whose id does not resolve to a stored record are
    /// silently skipped; hit order is preserved for the rest.
    pub async fn search_similar_to_query(&self, text: &str, n: usize) -> Result<Vec<Record>> {
        let query_vector = self.embedder.embed(text).await?;
        let hits = self.index.nearest(&query_vector, n)?;

        let ids: Vec<String> = hits.into_iter().map(|h| h.id).collect();
        self.store.get_many(&ids)
    }

    /// Derive a query from a record's own fields, then search.
    ///
    /// Returns `None` when the record does not exist. An unrecognized
    /// discriminator derives the empty query, which goes through to the
    /// embedding step unchanged.
    pub async fn search_similar_to_record(
        &self,
        id: &str,
        n: usize,
    ) -> Result<Option<Vec<Record>>> {
        let Some(record) = self.store.get(id)? else {
            return Ok(None);
        };

        let query = record.similarity_query();
        let similar = self.search_similar_to_query(&query, n).await?;
        Ok(Some(similar))
    }

    /// Lightweight coordinate-bearing points for map consumption
    pub fn discover(&self) -> Result<Vec<DiscoverPoint>> {
        self.store.discover(DISCOVER_LIMIT)
    }
}
