//! Configuration management
//!
//! Every external collaborator (record store, search API, LLM/embedding
//! services) is configured here. Values come from an optional YAML file at
//! `Config::default_path()`, with environment variables filling the gaps.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Record store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Web search service configuration
    #[serde(default)]
    pub search: SearchServiceConfig,

    /// LLM service configuration
    #[serde(default)]
    pub llm: LlmServiceConfig,

    /// Tagging pipeline configuration
    #[serde(default)]
    pub tagging: TaggingConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: std::env::var("MOSAIC_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_db_path()),
        }
    }
}

/// Web search service configuration (Tavily-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchServiceConfig {
    /// Endpoint URL of the search API
    pub url: String,

    /// API key (required for hosted services)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum results per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("MOSAIC_SEARCH_URL")
                .unwrap_or_else(|_| "https://api.tavily.com/search".to_string()),
            api_key: std::env::var("MOSAIC_SEARCH_API_KEY").ok(),
            max_results: default_max_results(),
            timeout_secs: default_timeout(),
        }
    }
}

/// LLM service configuration for external inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmServiceConfig {
    /// Base URL of the LLM service for chat/completions
    pub url: String,

    /// Model name for chat completions (article generation, tagging)
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Base URL for embeddings service (can be different from LLM URL)
    #[serde(default)]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding dimensions
    #[serde(default)]
    pub embedding_dimensions: Option<usize>,

    /// API key (optional, for authenticated services)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LlmServiceConfig {
    /// Get the embeddings URL (falls back to main URL if not specified)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }
}

impl Default for LlmServiceConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("MOSAIC_LLM_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            model: default_chat_model(),
            embedding_url: std::env::var("MOSAIC_EMBEDDING_URL").ok(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: std::env::var("MOSAIC_EMBEDDING_DIMS")
                .ok()
                .and_then(|s| s.parse().ok()),
            api_key: std::env::var("MOSAIC_LLM_API_KEY").ok(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Tagging pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingConfig {
    /// Path to the tag vocabulary JSON file
    pub vocabulary_path: PathBuf,

    /// Maximum records fetched per tagging batch
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,

    /// Content is truncated to this many characters before classification
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            vocabulary_path: std::env::var("MOSAIC_TAGS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("Tags.json")),
            batch_limit: default_batch_limit(),
            max_content_length: default_max_content_length(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty means allow any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: std::env::var("MOSAIC_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_port),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_chat_model() -> String {
    std::env::var("MOSAIC_LLM_MODEL")
        .unwrap_or_else(|_| "meta-llama/Llama-3.1-8B-Instruct".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("MOSAIC_EMBEDDING_MODEL")
        .unwrap_or_else(|_| "sentence-transformers/all-MiniLM-L6-v2".to_string())
}

fn default_timeout() -> u64 {
    30
}

fn default_max_results() -> usize {
    5
}

fn default_batch_limit() -> usize {
    5000
}

fn default_max_content_length() -> usize {
    15000
}

fn default_port() -> u16 {
    8001
}

fn default_db_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(crate::CACHE_DIR_NAME)
        .join("records.sqlite")
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Validate that every setting required for a pipeline run is present.
    ///
    /// Returns the list of human-readable issues; empty means ready.
    pub fn check(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.search.api_key.as_deref().unwrap_or("").is_empty() {
            issues.push("search API key is not set (MOSAIC_SEARCH_API_KEY)".to_string());
        }
        if self.llm.url.is_empty() {
            issues.push("LLM service URL is not set (MOSAIC_LLM_URL)".to_string());
        }
        if self.store.path.as_os_str().is_empty() {
            issues.push("record store path is not set (MOSAIC_DB)".to_string());
        }
        if !self.tagging.vocabulary_path.exists() {
            issues.push(format!(
                "tag vocabulary file not found at {}",
                self.tagging.vocabulary_path.display()
            ));
        }

        issues
    }
}
