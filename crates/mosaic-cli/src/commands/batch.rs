//! Batch command: generate articles over a topic list

use crate::app::BatchArgs;
use anyhow::Result;
use mosaic_core::error::exit_codes;
use mosaic_core::{run_batch, BatchOptions, Config};
use std::time::Duration;

pub async fn run(args: BatchArgs, config: &Config) -> Result<i32> {
    println!("==== Batch AI Article Generator ====");
    println!("Number of topics: {}", args.articles);
    println!("Delay between topics: {} seconds", args.delay);
    if let Some(ref output) = args.output {
        println!("Output file: {}", output.display());
    }
    println!();

    if args.dry_run {
        return dry_run(config);
    }

    let topics = match args.topics_file {
        Some(ref path) => {
            let content = std::fs::read_to_string(path)?;
            let topics: Vec<String> = serde_json::from_str(&content)?;
            println!("Loaded {} topics from {}", topics.len(), path.display());
            Some(topics)
        }
        None => None,
    };

    let store = super::open_store(config)?;
    let pipeline = super::build_pipeline(config, store)?;

    let options = BatchOptions {
        articles: args.articles,
        per_topic_limit: args.limit,
        delay: Duration::from_secs(args.delay),
        topics,
    };

    let report = run_batch(&pipeline, &options).await;

    if let Some(ref output) = args.output {
        std::fs::write(output, serde_json::to_string_pretty(&report)?)?;
        println!("Results written to {}", output.display());
    }

    println!();
    println!("==== Batch Generation Results ====");
    println!("Topics processed: {}", report.total_topics);
    println!("Topics successful: {}", report.successful_topics);
    println!("Topics failed: {}", report.failed_topics);
    println!("Articles stored: {}", report.total_articles);

    Ok(if report.all_succeeded() {
        exit_codes::SUCCESS
    } else {
        exit_codes::GENERAL_ERROR
    })
}

/// Validate that required configuration is present, without touching any
/// external service.
fn dry_run(config: &Config) -> Result<i32> {
    println!("Checking environment setup...");
    let issues = config.check();

    if issues.is_empty() {
        println!("Environment setup looks good; all required settings are present.");
        println!("You can now run the generator without the --dry-run flag.");
        Ok(exit_codes::SUCCESS)
    } else {
        println!("Environment issues found:");
        for issue in &issues {
            println!("  - {}", issue);
        }
        println!("Please set the missing variables and try again.");
        Ok(exit_codes::INVALID_INPUT)
    }
}
