// src/core/crawler.rs

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::core::analytics;
use crate::core::models::DomainRecord;
use crate::core::page;
use crate::core::probe::{self, ProbeClients, USER_AGENT};
use crate::core::report;
use crate::core::summarize::{self, Summarizer};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// File locations and limits for one crawl run.
pub struct CrawlerConfig {
    pub domain_file_path: PathBuf,
    pub analytics_file_path: PathBuf,
    pub output_file_path: PathBuf,
    pub max_concurrent_domains: usize,
}

/// Runs the whole pipeline: load inputs, probe every domain, merge analytics
/// and write the report.
///
/// Input files and the output sink are opened before any probing, so a
/// misconfigured run fails fast with a diagnostic instead of probing for
/// nothing. Past that point only file-write errors can abort; every network
/// or parse failure degrades a single field of a single record.
pub async fn crawl(config: &CrawlerConfig, summarizer: Option<Arc<dyn Summarizer>>) -> Result<()> {
    let domains = parse_domain_file(&config.domain_file_path)?;
    let analytics = analytics::load_analytics(&config.analytics_file_path)?;
    let output = File::create(&config.output_file_path).wrap_err_with(|| {
        format!(
            "Cannot create output file {}",
            config.output_file_path.display()
        )
    })?;

    info!(
        domains = domains.len(),
        analytics_rows = analytics.len(),
        "Starting crawl."
    );

    let records = crawl_domains(&domains, config.max_concurrent_domains, summarizer).await?;
    let records = analytics::merge_traffic(records, &analytics);

    report::write_report(output, &records)?;
    info!(records = records.len(), output = %config.output_file_path.display(), "Report written.");
    Ok(())
}

/// Reads the domain list: CSV, header row skipped, column 0 is the domain.
fn parse_domain_file(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .wrap_err_with(|| format!("Cannot read domain file {}", path.display()))?;

    let mut domains = Vec::new();
    for row in reader.records() {
        let row = row.wrap_err_with(|| format!("Malformed domain file {}", path.display()))?;
        if let Some(domain) = row.get(0) {
            let domain = domain.trim();
            if !domain.is_empty() {
                domains.push(domain.to_string());
            }
        }
    }

    Ok(domains)
}

/// Probes every domain with bounded concurrency and collects one record per
/// domain, in input order.
///
/// One task per domain; join handles are awaited in spawn order, so the
/// fastest domain cannot jump the queue and the output is deterministic. A
/// panicked task degrades to a default record for its domain rather than
/// losing the row.
pub async fn crawl_domains(
    domains: &[String],
    max_concurrent: usize,
    summarizer: Option<Arc<dyn Summarizer>>,
) -> Result<Vec<DomainRecord>> {
    let clients = Arc::new(ProbeClients::new(PROBE_TIMEOUT)?);
    let fetch_client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

    let mut handles = Vec::with_capacity(domains.len());
    for domain in domains {
        let domain = domain.clone();
        let clients = Arc::clone(&clients);
        let fetch_client = fetch_client.clone();
        let summarizer = summarizer.clone();
        let semaphore = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            // The semaphore is never closed; a failed acquire only means we
            // proceed without a permit.
            let _permit = semaphore.acquire_owned().await.ok();
            crawl_domain(domain, &clients, &fetch_client, summarizer.as_deref()).await
        }));
    }

    let mut records = Vec::with_capacity(handles.len());
    for (domain, handle) in domains.iter().zip(handles) {
        match handle.await {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(domain = %domain, error = %e, "Domain task failed, reporting an empty record.");
                records.push(DomainRecord::new(domain));
            }
        }
    }

    Ok(records)
}

/// Produces the record for a single domain: the four-probe join, then the
/// conditional scrape and summarization.
async fn crawl_domain(
    domain: String,
    clients: &ProbeClients,
    fetch_client: &Client,
    summarizer: Option<&dyn Summarizer>,
) -> DomainRecord {
    info!(domain = %domain, "Probing domain.");

    let probes = probe::run_domain_probe(&domain, clients).await;
    let mut record = DomainRecord::new(&domain);
    record.probes = probes;

    // Scraping and description only make sense for a site that answers on
    // HTTPS; the probe join above is the barrier that established that.
    if !record.probes.answers_https {
        return record;
    }

    let url = format!("https://{}/", record.domain);
    describe_page(&mut record, &url, fetch_client, summarizer).await;
    record
}

/// Fills in the scraped fields and description for a record whose HTTPS
/// probe succeeded. Both steps fail per-domain: an error leaves the affected
/// fields empty and the run moves on.
pub async fn describe_page(
    record: &mut DomainRecord,
    url: &str,
    fetch_client: &Client,
    summarizer: Option<&dyn Summarizer>,
) {
    match page::fetch_page(url, fetch_client).await {
        Ok(content) => record.page = content,
        Err(e) => {
            warn!(domain = %record.domain, error = %e, "Page fetch failed, leaving scrape fields empty.")
        }
    }

    let summarizer = match summarizer {
        Some(summarizer) => summarizer,
        None => return,
    };

    let prompt = summarize::build_prompt(url);
    match summarizer.summarize(&prompt).await {
        Ok(text) => record.description = text,
        Err(e) => {
            warn!(domain = %record.domain, error = %e, "Summarization failed, leaving description empty.")
        }
    }
}
