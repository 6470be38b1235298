//! Tagging batch runner
//!
//! Sequentially classifies and tags a batch of untagged records,
//! aggregating success/fail/no-content counts.

use super::classifier::TagClassifier;
use crate::store::{RecordStore, UntaggedRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Aggregated counts for one tagging batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaggingReport {
    /// Records picked up by the batch
    pub queued: usize,
    /// Tags written successfully
    pub success: usize,
    /// Update failed or record vanished
    pub failed: usize,
    /// Skipped for missing/empty content
    pub no_content: usize,
}

/// Tag a prefetched list of records.
pub async fn tag_records(
    store: Arc<dyn RecordStore>,
    classifier: Arc<TagClassifier>,
    records: Vec<UntaggedRecord>,
) -> TaggingReport {
    let mut report = TaggingReport {
        queued: records.len(),
        ..Default::default()
    };

    tracing::info!("Tagging batch started: processing {} records", report.queued);

    for record in records {
        let content = match record.content.as_deref() {
            Some(content) if !content.trim().is_empty() => content,
            _ => {
                tracing::warn!(
                    "Skipping record {}: missing or empty content field",
                    record.id
                );
                report.no_content += 1;
                continue;
            }
        };

        let tags = classifier.classify(content).await;

        match store.apply_tags(&record.id, &tags) {
            Ok(true) => {
                tracing::debug!("Tagged record {} with {:?}", record.id, tags);
                report.success += 1;
            }
            Ok(false) => {
                tracing::warn!("Failed to update tags for record {}", record.id);
                report.failed += 1;
            }
            Err(e) => {
                tracing::error!("Error updating record {}: {}", record.id, e);
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        "Tagging batch finished. Success: {}, Failed: {}, No Content: {}",
        report.success,
        report.failed,
        report.no_content
    );
    report
}

/// Fetch a bounded batch of untagged records and tag them.
pub async fn run_tagging_batch(
    store: Arc<dyn RecordStore>,
    classifier: Arc<TagClassifier>,
    limit: usize,
) -> TaggingReport {
    let records = match store.fetch_untagged(limit) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Error fetching untagged records: {}", e);
            return TaggingReport::default();
        }
    };

    tag_records(store, classifier, records).await
}
