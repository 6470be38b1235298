//! Scrape command: run the content pipeline for one topic

use crate::app::ScrapeArgs;
use anyhow::Result;
use mosaic_core::error::exit_codes;
use mosaic_core::{Config, TopicStatus};

pub async fn run(args: ScrapeArgs, config: &Config) -> Result<i32> {
    println!("==== AI Topic Scraper ====");
    println!("Topic: {}", args.topic);
    println!("Article limit: {}", args.limit);
    println!();

    let store = super::open_store(config)?;
    let pipeline = super::build_pipeline(config, store)?;

    let report = pipeline.run_topic(&args.topic, args.limit).await;

    println!("==== Scraping Results ====");
    println!("Status: {}", report.status.as_str());
    println!(
        "Articles processed: {}/{}",
        report.articles_processed, report.articles_attempted
    );
    if let Some(ref error) = report.error {
        println!("Error: {}", error);
    }
    for result in &report.results {
        println!("  {} {} ({})", result.status.as_str(), result.title, result.id);
    }
    println!("Trace ID: {}", report.trace_id);

    let failed = report.status != TopicStatus::Completed
        || report.articles_processed < report.articles_attempted;
    Ok(if failed {
        exit_codes::GENERAL_ERROR
    } else {
        exit_codes::SUCCESS
    })
}
