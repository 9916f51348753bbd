//! Domain probing and report generation.
//!
//! The library side of beacon: network probes, page scraping, the
//! summarization abstraction, the per-domain orchestrator, the analytics
//! merge and the report writer. The binary in `main.rs` is a thin CLI over
//! [`core::crawler::crawl`].

pub mod core;
pub mod logging;
