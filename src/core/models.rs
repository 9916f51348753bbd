// src/core/models.rs

use serde::{Deserialize, Serialize};
use std::time::Duration;

// --- Probe Outcomes ---

// The result of the four per-domain network probes. Each field is produced
// by exactly one probe; the orchestrator assembles them after all four have
// resolved.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub answers_http: bool,
    pub redirects_to_https: bool,
    pub answers_https: bool,
    pub valid_certificate: bool,
}

// --- Scraped Page Content ---

// Lightweight metadata extracted from a domain's landing page. All fields
// stay empty when the page could not be fetched or contained no usable HTML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    pub title: String,
    pub h1_text: String,
    // One entry per h2 element, in document order.
    pub h2_text: Vec<String>,
}

// --- Analytics ---

// Per-domain traffic statistics from the external analytics export. Fields
// keep their zero value for domains absent from the export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficStats {
    pub page_views: u64,
    pub unique_views: u64,
    pub avg_time_page: Duration,
    pub bounce_rate: f32,
    pub exit_percentage: f32,
}

// One parsed row of the analytics dataset. The domain is normalized (one
// trailing slash stripped) and serves as the join key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub domain: String,
    pub stats: TrafficStats,
}

// --- Consolidated Record ---

// The aggregated report row for one input domain: probe outcomes, scraped
// content, the optional page description and merged analytics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainRecord {
    pub domain: String,
    pub probes: ProbeOutcome,
    pub page: PageContent,
    // Populated only when summarization ran and succeeded.
    pub description: String,
    pub traffic: TrafficStats,
}

impl DomainRecord {
    // A record starts with only the domain set; probes, scrape and merge
    // fill in the rest.
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ..Default::default()
        }
    }
}
