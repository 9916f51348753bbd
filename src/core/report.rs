// src/core/report.rs

use std::io::Write;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};

use crate::core::models::DomainRecord;

// Column order is fixed; consumers of the report match on it.
const REPORT_COLUMNS: [&str; 14] = [
    "domain",
    "answer_http",
    "redirects_to_https",
    "answers_https",
    "valid_certificate",
    "title",
    "h1_text",
    "h2_text",
    "description",
    "page_views",
    "unique_page_views",
    "avg_time_page",
    "bounce_rate",
    "exit_percentage",
];

/// Serializes the consolidated records: one fixed header line, then one CSV
/// row per record in the order the orchestrator delivered them.
pub fn write_report<W: Write>(mut writer: W, records: &[DomainRecord]) -> Result<()> {
    // Downstream tooling expects the header columns joined by ", ", not
    // plain CSV commas, so the header is written as a raw line.
    writeln!(writer, "{}", REPORT_COLUMNS.join(", ")).wrap_err("Cannot write report header")?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer
            .write_record(record_to_row(record))
            .wrap_err("Cannot write report row")?;
    }

    csv_writer.flush().wrap_err("Cannot flush report")?;
    Ok(())
}

fn record_to_row(record: &DomainRecord) -> Vec<String> {
    vec![
        record.domain.clone(),
        record.probes.answers_http.to_string(),
        record.probes.redirects_to_https.to_string(),
        record.probes.answers_https.to_string(),
        record.probes.valid_certificate.to_string(),
        record.page.title.clone(),
        record.page.h1_text.clone(),
        record.page.h2_text.join(", "),
        record.description.clone(),
        record.traffic.page_views.to_string(),
        record.traffic.unique_views.to_string(),
        format_clock(record.traffic.avg_time_page),
        format!("{:.2}", record.traffic.bounce_rate),
        format!("{:.2}", record.traffic.exit_percentage),
    ]
}

/// Renders a duration in the report's `HH:MM:SS` form.
pub fn format_clock(duration: Duration) -> String {
    let total = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
