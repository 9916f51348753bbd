// src/core/mod.rs

/// Data structures shared across the pipeline, such as `DomainRecord` and
/// the per-probe outcome types.
pub mod models;

/// The four per-domain network probes and their concurrent orchestration.
pub mod probe;

/// Landing-page fetching and HTML metadata extraction.
pub mod page;

/// The abstract page summarization capability and its HTTP-backed client.
pub mod summarize;

/// Per-domain fan-out, the probe join and result collection.
pub mod crawler;

/// Loading of the analytics export and its merge into crawl results.
pub mod analytics;

/// Serialization of the consolidated report.
pub mod report;
