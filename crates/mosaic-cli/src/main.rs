//! Mosaic CLI
//!
//! Batch drivers for the AI-content pipeline, plus the serving daemon.

use anyhow::Result;
use clap::Parser;
use mosaic_core::Config;

mod app;
mod commands;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    let config = Config::load()?;

    let exit_code = match cli.command {
        Commands::Scrape(args) => commands::scrape::run(args, &config).await?,
        Commands::Batch(args) => commands::batch::run(args, &config).await?,
        Commands::Embed(args) => commands::embed::run(args, &config).await?,
        Commands::Serve(args) => commands::serve::run(args, &config).await?,
    };

    std::process::exit(exit_code)
}
