//! Command implementations

pub mod batch;
pub mod embed;
pub mod scrape;
pub mod serve;

use anyhow::Result;
use mosaic_core::{
    Config, ContentPipeline, HttpLlmClient, HttpSearchClient, SqliteStore,
};
use std::sync::Arc;

/// Open and initialize the record store from configuration
pub fn open_store(config: &Config) -> Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(&config.store.path)?;
    store.initialize()?;
    Ok(Arc::new(store))
}

/// Build the content pipeline with real collaborators
pub fn build_pipeline(config: &Config, store: Arc<SqliteStore>) -> Result<ContentPipeline> {
    let search = Arc::new(HttpSearchClient::new(config.search.clone())?);
    let llm = Arc::new(HttpLlmClient::new(config.llm.clone())?);
    Ok(ContentPipeline::new(
        search,
        llm,
        store,
        config.search.max_results,
    ))
}
