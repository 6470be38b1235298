//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mosaic")]
#[command(
    author,
    version,
    about = "Scrape, tag and serve short articles about AI topics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the content pipeline for a single topic
    Scrape(ScrapeArgs),

    /// Generate articles for a batch of topics
    Batch(BatchArgs),

    /// Backfill the vector index with record embeddings
    Embed(EmbedArgs),

    /// Start the HTTP serving layer
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct ScrapeArgs {
    /// AI topic to search for (e.g., 'large language models')
    pub topic: String,

    /// Maximum number of articles to process
    #[arg(long, default_value = "5")]
    pub limit: usize,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Number of topics to process
    #[arg(long, default_value = "5")]
    pub articles: usize,

    /// Articles generated per topic
    #[arg(long, default_value = "1")]
    pub limit: usize,

    /// Delay in seconds between topics
    #[arg(long, default_value = "5")]
    pub delay: u64,

    /// Output file for the batch report (JSON)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// JSON file containing the list of topics to process
    #[arg(long)]
    pub topics_file: Option<PathBuf>,

    /// Check configuration without generating articles
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct EmbedArgs {
    /// Texts sent to the embedding service per request
    #[arg(long, default_value = "32")]
    pub batch_size: usize,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Port to bind (overrides configuration)
    #[arg(long)]
    pub port: Option<u16>,
}
