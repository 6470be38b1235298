//! Embed command: backfill the vector index for stored records

use crate::app::EmbedArgs;
use anyhow::Result;
use mosaic_core::error::exit_codes;
use mosaic_core::{Config, HttpLlmClient, LlmClient, VectorIndex};
use std::sync::Arc;

pub async fn run(args: EmbedArgs, config: &Config) -> Result<i32> {
    let store = super::open_store(config)?;
    let llm = Arc::new(HttpLlmClient::new(config.llm.clone())?);
    let model = config.llm.embedding_model.clone();

    let pending = store.records_missing_embedding()?;
    if pending.is_empty() {
        println!("All records already have embeddings.");
        return Ok(exit_codes::SUCCESS);
    }

    println!(
        "Embedding {} records with {} ({} dimensions)",
        pending.len(),
        model,
        llm.embedding_dimensions()
    );

    let mut embedded = 0;
    let mut skipped = 0;
    let mut failed = 0;

    let batch_size = args.batch_size.max(1);
    for chunk in pending.chunks(batch_size) {
        let mut ids = Vec::with_capacity(chunk.len());
        let mut texts = Vec::with_capacity(chunk.len());

        for record in chunk {
            let text = record.content_text();
            if text.trim().is_empty() {
                skipped += 1;
                continue;
            }
            ids.push(record.id.clone());
            texts.push(text.to_string());
        }

        if texts.is_empty() {
            continue;
        }

        match llm.embed_batch(&texts).await {
            Ok(embeddings) => {
                for (id, embedding) in ids.iter().zip(embeddings.iter()) {
                    match store.upsert(id, &model, embedding) {
                        Ok(()) => embedded += 1,
                        Err(e) => {
                            tracing::error!("Failed to store embedding for {}: {}", id, e);
                            failed += 1;
                        }
                    }
                }
            }
            Err(e) => {
                tracing::error!("Embedding batch failed: {}", e);
                failed += ids.len();
            }
        }

        eprint!("\rProcessed: {}/{} records   ", embedded + skipped + failed, pending.len());
    }
    eprintln!();

    println!("Embedding complete:");
    println!("  Embedded: {}", embedded);
    println!("  Skipped (no content): {}", skipped);
    if failed > 0 {
        println!("  Failed: {}", failed);
    }

    Ok(if failed == 0 {
        exit_codes::SUCCESS
    } else {
        exit_codes::GENERAL_ERROR
    })
}
