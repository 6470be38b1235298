//! Mosaic Core Library
//!
//! Core functionality for the mosaic AI-content system.
//!
//! # Features
//! - Search-to-article content pipeline with a resumable per-topic workflow
//! - LLM tag classification against a controlled vocabulary
//! - SQLite-backed JSON record store with embedding similarity search
//! - Read-side serving layer: listing, lookup, similar items, discover

pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod search;
pub mod store;
pub mod tagging;

pub use config::{
    Config, LlmServiceConfig, SearchServiceConfig, ServerConfig, StoreConfig, TaggingConfig,
};
pub use error::{Error, MosaicError, Result};
pub use llm::{ChatMessage, HttpLlmClient, LlmClient, MetricsSnapshot};
pub use pipeline::{
    run_batch, BatchOptions, BatchReport, ContentPipeline, RecordOutcome, RecordStatus,
    TopicReport, TopicStatus, DEFAULT_TOPICS,
};
pub use query::{Lookup, ServingLayer, DISCOVER_LIMIT, SIMILAR_DEFAULT_N};
pub use record::{Record, RecordContent, RecordKind, RecordMetadata, RecordSource, ScraperMetadata};
pub use search::{HttpSearchClient, SearchClient, SearchHit};
pub use store::{
    DiscoverPoint, PageResult, RecordStore, SqliteStore, UntaggedRecord, VectorHit, VectorIndex,
};
pub use tagging::{
    run_tagging_batch, tag_records, JobRegistry, JobStatus, TagClassifier, TagJob, TagVocabulary,
    TaggingReport,
};

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "mosaic";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "mosaic";
