// src/main.rs

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::warn;

use beacon_rs_probe::core::crawler::{CrawlerConfig, crawl};
use beacon_rs_probe::core::summarize::{OpenAiSummarizer, Summarizer};
use beacon_rs_probe::logging;

/// Probes a list of domains for HTTP/HTTPS reachability, redirect behavior
/// and certificate validity, scrapes their landing pages, and merges the
/// results with an analytics export into a single CSV report.
#[derive(Parser, Debug)]
#[command(name = "beacon", version, about = "Domain probing and report generation")]
struct Cli {
    /// CSV file listing the domains to probe (header skipped, first column read)
    #[arg(value_name = "DOMAIN_FILE")]
    domain_file: PathBuf,

    /// CSV export of per-domain traffic statistics
    #[arg(value_name = "ANALYTICS_FILE")]
    analytics_file: PathBuf,

    /// Destination for the consolidated CSV report
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: PathBuf,

    /// API key for the page summarization service
    #[arg(long, env = "OPEN_AI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum number of domains probed at the same time
    #[arg(long, default_value_t = 16)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // A missing .env file is fine; anything else wrong with it is not.
    dotenvy::dotenv().map(|_| ()).or_else(|err| match err {
        dotenvy::Error::Io(_) => Ok(()),
        _ => Err(err),
    })?;

    let cli = Cli::parse();
    logging::initialize_logging()?;

    let summarizer: Option<Arc<dyn Summarizer>> = match cli.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            Some(Arc::new(OpenAiSummarizer::new(key.to_string())?))
        }
        _ => {
            warn!("No API key configured, page descriptions will be left empty.");
            None
        }
    };

    let config = CrawlerConfig {
        domain_file_path: cli.domain_file,
        analytics_file_path: cli.analytics_file,
        output_file_path: cli.output_file,
        max_concurrent_domains: cli.concurrency,
    };

    crawl(&config, summarizer).await
}
