//! Serve command: start the HTTP serving layer

use crate::app::ServeArgs;
use anyhow::Result;
use mosaic_core::error::exit_codes;
use mosaic_core::{
    Config, HttpLlmClient, JobRegistry, ServingLayer, TagClassifier, TagVocabulary,
};
use mosaic_server::AppState;
use std::sync::Arc;

pub async fn run(args: ServeArgs, config: &Config) -> Result<i32> {
    let store = super::open_store(config)?;
    let llm = Arc::new(HttpLlmClient::new(config.llm.clone())?);

    let vocabulary = Arc::new(TagVocabulary::load(&config.tagging.vocabulary_path)?);
    let classifier = Arc::new(TagClassifier::new(
        llm.clone(),
        vocabulary,
        config.tagging.max_content_length,
    ));

    let serving = Arc::new(ServingLayer::new(store.clone(), store.clone(), llm));

    let state = AppState {
        serving,
        store,
        classifier,
        jobs: Arc::new(JobRegistry::new()),
        batch_limit: config.tagging.batch_limit,
    };

    let port = args.port.unwrap_or(config.server.port);
    mosaic_server::start(state, port, &config.server.allowed_origins).await?;

    Ok(exit_codes::SUCCESS)
}
