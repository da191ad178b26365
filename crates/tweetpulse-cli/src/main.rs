mod analyze;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tweetpulse_sentiment::{SentimentPipeline, MAX_PAGE_SIZE};

use crate::analyze::{run_analyze, AnalyzeArgs};

#[derive(Debug, Parser)]
#[command(name = "tweetpulse-cli")]
#[command(about = "Sentiment analysis of recent tweets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch recent tweets for a query and classify their sentiment
    Analyze {
        /// Search query, passed to the Twitter API as given
        query: String,
        /// Number of tweets to fetch (defaults to `TWEETPULSE_MAX_RESULTS`)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE)))]
        max_results: Option<u32>,
        /// Write `Tweet,Sentiment,Score` rows to this file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Number of most frequent words to show
        #[arg(long, default_value = "15")]
        words: usize,
        /// Number of sample tweets to show
        #[arg(long, default_value = "5")]
        samples: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(Commands::Analyze {
        query,
        max_results,
        csv,
        words,
        samples,
    }) = cli.command
    else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = tweetpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pipeline = SentimentPipeline::from_app_config(&config)?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received ctrl-c, cancelling");
            on_ctrl_c.cancel();
        }
    });

    let args = AnalyzeArgs {
        query,
        max_results: max_results.unwrap_or(config.max_results),
        csv,
        words,
        samples,
    };
    run_analyze(&pipeline, &args, &cancel, &mut std::io::stdout()).await
}
