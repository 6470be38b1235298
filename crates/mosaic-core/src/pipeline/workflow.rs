//! Per-topic scraper workflow
//!
//! A sequential state machine: search for a topic, structure the hits into
//! records, generate long-form text for each via the LLM, persist each
//! before moving to the next. Stages degrade instead of failing; only a
//! failed search terminates a topic early.

use crate::llm::{strip_code_fences, ChatMessage, LlmClient};
use crate::record::{record_id, Record, RecordContent, RecordKind, RecordMetadata, RecordSource, ScraperMetadata};
use crate::search::{SearchClient, SearchHit};
use crate::store::RecordStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Topic-level workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    Initialized,
    SearchCompleted,
    SearchFailed,
    ResultsProcessed,
    Completed,
}

impl TopicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::SearchCompleted => "search_completed",
            Self::SearchFailed => "search_failed",
            Self::ResultsProcessed => "results_processed",
            Self::Completed => "completed",
        }
    }
}

/// Per-record status within a topic run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    ArticleGenerated,
    ArticleGeneratedWithErrors,
    GenerationFailed,
    ArticleStored,
    StorageFailed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ArticleGenerated => "article_generated",
            Self::ArticleGeneratedWithErrors => "article_generated_with_errors",
            Self::GenerationFailed => "generation_failed",
            Self::ArticleStored => "article_stored",
            Self::StorageFailed => "storage_failed",
        }
    }
}

/// Outcome for a single record processed within a topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub id: String,
    pub title: String,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a full topic run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicReport {
    pub topic: String,
    pub status: TopicStatus,
    pub trace_id: String,
    pub articles_attempted: usize,
    pub articles_processed: usize,
    pub results: Vec<RecordOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The search-to-article pipeline with injected collaborators
pub struct ContentPipeline {
    search: Arc<dyn SearchClient>,
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn RecordStore>,
    max_results: usize,
}

const GENERATION_SYSTEM_PROMPT: &str = r#"You are an AI research journalist who creates informative articles about artificial intelligence topics.
Your task is to create a comprehensive article based on the provided source content.

The article should:
1. Have a clear structure with introduction, body, and conclusion
2. Extract and infer key information from the source
3. Be factual and well-researched
4. Identify potential authors if mentioned in the content
5. Include relevant keywords for the topic
6. Be at least 250 words in length - longer articles are preferred

Format your response as a JSON object with the following structure:
{
    "article_text": "Full article text with proper paragraphs",
    "abstract": "A concise summary of the article (1-2 paragraphs)",
    "authors": ["Author Name 1", "Author Name 2"],
    "keywords": ["keyword1", "keyword2", "keyword3"],
    "published_date": "ISO date string if available, otherwise null"
}"#;

/// Expected shape of the generation response
#[derive(Debug, Default, Deserialize)]
struct GeneratedArticle {
    #[serde(default)]
    article_text: String,
    #[serde(default, rename = "abstract")]
    summary: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    published_date: Option<String>,
}

impl ContentPipeline {
    pub fn new(
        search: Arc<dyn SearchClient>,
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn RecordStore>,
        max_results: usize,
    ) -> Self {
        Self {
            search,
            llm,
            store,
            max_results,
        }
    }

    /// Search for a topic. Fails softly: an upstream error is returned as a
    /// message next to an empty hit list, never raised past this boundary.
    pub async fn search(&self, topic: &str) -> (Vec<SearchHit>, Option<String>) {
        let query = format!("latest research and developments in AI: {}", topic);
        tracing::info!("Search query: {}", query);

        match self.search.search(&query, self.max_results).await {
            Ok(hits) => {
                tracing::info!("Found {} search results", hits.len());
                (hits, None)
            }
            Err(e) => {
                tracing::error!("Search error for topic '{}': {}", topic, e);
                (Vec::new(), Some(format!("Search error: {}", e)))
            }
        }
    }

    /// Structure raw hits into records, truncating to `limit`.
    ///
    /// Ids hash the URL, title, and the current wall-clock time, so
    /// structuring the same hit twice yields two distinct records.
    pub fn structure(&self, hits: &[SearchHit], limit: usize) -> Vec<Record> {
        let mut records = Vec::with_capacity(hits.len().min(limit));

        for hit in hits.iter().take(limit) {
            let title = if hit.title.is_empty() {
                "Untitled".to_string()
            } else {
                hit.title.clone()
            };
            let id = record_id(&hit.url, &title);
            let platform = display_domain(&hit.url);
            let timestamp = Utc::now().to_rfc3339();

            let record = Record {
                id,
                kind: RecordKind::Article,
                source: RecordSource {
                    platform,
                    url: hit.url.clone(),
                    scrape_timestamp: timestamp,
                },
                metadata: RecordMetadata {
                    title,
                    ..Default::default()
                },
                content: RecordContent {
                    description: hit.content.clone(),
                    ..Default::default()
                },
                raw_text: Some(hit.content.clone()),
                scraper_metadata: ScraperMetadata::default(),
                assigned_tags: None,
                tags_assigned_at: None,
                coords: None,
            };

            tracing::info!(
                "Processed article: {} ({})",
                record.metadata.title,
                record.id
            );
            records.push(record);
        }

        records
    }

    /// Generate long-form content for a record via the LLM.
    ///
    /// Degrade, never fail: unparseable output is captured verbatim as the
    /// article text with a diagnostic and lowered confidence; an upstream
    /// error leaves the record unenriched with the error recorded.
    pub async fn generate(&self, mut record: Record) -> (Record, RecordStatus) {
        let prompt = format!(
            "Source Title: {}\nSource URL: {}\nSource Content: {}\n\n\
             Based on this information, please generate a comprehensive article of at least 250 words.",
            record.metadata.title,
            record.source.url,
            record.raw_text.as_deref().unwrap_or_default()
        );

        let messages = vec![
            ChatMessage::system(GENERATION_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ];

        let response = match self.llm.chat_completion(messages).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Article generation error: {}", e);
                record
                    .scraper_metadata
                    .errors
                    .push(format!("Generation error: {}", e));
                return (record, RecordStatus::GenerationFailed);
            }
        };

        let payload = strip_code_fences(&response);
        match serde_json::from_str::<GeneratedArticle>(payload) {
            Ok(article) => {
                record.content.article_text = article.article_text;
                record.content.summary = article.summary;
                record.content.keywords = article.keywords;
                record.metadata.authors = article.authors;
                if article.published_date.is_some() {
                    record.metadata.published_date = article.published_date;
                }

                tracing::info!(
                    "Generated article with {} characters",
                    record.content.article_text.len()
                );
                (record, RecordStatus::ArticleGenerated)
            }
            Err(e) => {
                tracing::error!("Error parsing LLM output as JSON: {}", e);

                // Salvage as plain text
                record.content.article_text = response;
                record
                    .scraper_metadata
                    .errors
                    .push(format!("JSON parse error: {}", e));
                record.scraper_metadata.extraction_confidence = 0.5;
                (record, RecordStatus::ArticleGeneratedWithErrors)
            }
        }
    }

    /// Stamp timestamps and insert. Returns false, not an error, on storage
    /// failure.
    pub fn persist(&self, record: &mut Record) -> bool {
        let now = Utc::now();
        record.metadata.created_at = Some(now);
        record.metadata.updated_at = Some(now);

        match self.store.insert(record) {
            Ok(()) => {
                tracing::info!("Stored article: {}", record.id);
                true
            }
            Err(e) => {
                tracing::error!("Error storing article {}: {}", record.id, e);
                false
            }
        }
    }

    /// Run the full workflow for one topic.
    pub async fn run_topic(&self, topic: &str, limit: usize) -> TopicReport {
        let trace_id = run_trace_id(topic);
        tracing::info!("Starting scraper workflow for topic: {} ({})", topic, trace_id);

        let (hits, search_error) = self.search(topic).await;
        if let Some(error) = search_error {
            return TopicReport {
                topic: topic.to_string(),
                status: TopicStatus::SearchFailed,
                trace_id,
                articles_attempted: 0,
                articles_processed: 0,
                results: Vec::new(),
                error: Some(error),
            };
        }

        let records = self.structure(&hits, limit);
        let articles_attempted = records.len();
        let mut results = Vec::with_capacity(articles_attempted);
        let mut articles_processed = 0;

        for record in records {
            let (mut record, generation_status) = self.generate(record).await;
            let generation_error = match generation_status {
                RecordStatus::ArticleGenerated => None,
                _ => record.scraper_metadata.errors.last().cloned(),
            };

            let status = if self.persist(&mut record) {
                articles_processed += 1;
                RecordStatus::ArticleStored
            } else {
                RecordStatus::StorageFailed
            };

            results.push(RecordOutcome {
                id: record.id,
                title: record.metadata.title,
                status,
                error: generation_error,
            });
        }

        tracing::info!(
            "Workflow complete for '{}': {}/{} articles stored",
            topic,
            articles_processed,
            articles_attempted
        );

        TopicReport {
            topic: topic.to_string(),
            status: TopicStatus::Completed,
            trace_id,
            articles_attempted,
            articles_processed,
            results,
            error: None,
        }
    }
}

/// Extract the display domain from a URL (host without a `www.` prefix)
pub fn display_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Per-run trace id (topic + wall-clock hash)
fn run_trace_id(topic: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(topic.as_bytes());
    hasher.update(Utc::now().to_rfc3339().as_bytes());
    let digest = hasher.finalize();
    digest
        .iter()
        .take(8)
        .map(|b| format!("{:02x}", b))
        .collect()
}
