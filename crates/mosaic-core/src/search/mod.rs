//! Web search collaborator
//!
//! Thin client for a Tavily-style search API: text query in, ranked
//! {title, url, content} hits out.

use crate::config::SearchServiceConfig;
use crate::error::{MosaicError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single ranked web search result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Content snippet extracted by the search API
    #[serde(default)]
    pub content: String,
}

/// Trait for web search clients
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a text query, returning ranked hits
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// HTTP search client for Tavily-compatible APIs
pub struct HttpSearchClient {
    http_client: reqwest::Client,
    config: SearchServiceConfig,
}

impl HttpSearchClient {
    /// Create new client from configuration
    pub fn new(config: SearchServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(MosaicError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(SearchServiceConfig::default())
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        #[derive(Serialize)]
        struct SearchRequest<'a> {
            api_key: &'a str,
            query: &'a str,
            max_results: usize,
        }

        #[derive(Deserialize)]
        struct SearchResponse {
            #[serde(default)]
            results: Vec<SearchHit>,
        }

        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            MosaicError::Config("search API key is not configured".to_string())
        })?;

        let request = SearchRequest {
            api_key,
            query,
            max_results,
        };

        let response = self
            .http_client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(MosaicError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MosaicError::ExternalError(format!(
                "Search service error (HTTP {}): {}",
                status, body
            )));
        }

        let search_response: SearchResponse =
            response.json().await.map_err(MosaicError::Http)?;

        tracing::debug!(
            "Search returned {} hits for query: {}",
            search_response.results.len(),
            query
        );

        Ok(search_response.results)
    }
}
