//! Shared application state

use mosaic_core::{JobRegistry, RecordStore, ServingLayer, TagClassifier};
use std::sync::Arc;

/// State shared across handlers; every collaborator is constructed at
/// startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub serving: Arc<ServingLayer>,
    pub store: Arc<dyn RecordStore>,
    pub classifier: Arc<TagClassifier>,
    pub jobs: Arc<JobRegistry>,
    /// Records fetched per tagging trigger
    pub batch_limit: usize,
}
