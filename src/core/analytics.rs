// src/core/analytics.rs

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::core::models::{DomainRecord, TrafficStats};

// Matches the export's `HH:MM:SS` time-on-page format.
static RE_CLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):([0-5]?\d):([0-5]?\d)$").unwrap());

/// Loads the analytics export into a map keyed by normalized domain.
///
/// Expected columns: domain, page_views, unique_views, avg_time_page,
/// bounce_rate, exit_percentage. An unreadable file is fatal; a malformed
/// row is skipped with a warning; a malformed field degrades to its zero
/// value so the rest of the row survives.
pub fn load_analytics(path: &Path) -> Result<HashMap<String, TrafficStats>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .wrap_err_with(|| format!("Cannot read analytics file {}", path.display()))?;

    let mut table = HashMap::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "Skipping malformed analytics row.");
                continue;
            }
        };

        let domain = normalize_domain_key(row.get(0).unwrap_or(""));
        if domain.is_empty() {
            warn!("Skipping analytics row without a domain.");
            continue;
        }

        let stats = TrafficStats {
            page_views: parse_count(row.get(1).unwrap_or("")),
            unique_views: parse_count(row.get(2).unwrap_or("")),
            avg_time_page: parse_clock(row.get(3).unwrap_or("")),
            bounce_rate: parse_percent(row.get(4).unwrap_or("")),
            exit_percentage: parse_percent(row.get(5).unwrap_or("")),
        };

        table.insert(domain, stats);
    }

    debug!(rows = table.len(), "Analytics dataset loaded.");
    Ok(table)
}

/// Left-joins the analytics map onto the crawl results. Records without a
/// matching analytics row are returned untouched.
pub fn merge_traffic(
    mut records: Vec<DomainRecord>,
    analytics: &HashMap<String, TrafficStats>,
) -> Vec<DomainRecord> {
    for record in &mut records {
        if let Some(stats) = analytics.get(normalize_domain_key(&record.domain).as_str()) {
            record.traffic = stats.clone();
        }
    }
    records
}

// The only normalization applied to domain keys: strip one trailing slash,
// so both sides of the join agree regardless of which input carried it.
pub fn normalize_domain_key(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix('/').unwrap_or(trimmed).to_string()
}

// "1,234" style counts; the export writes thousands separators.
fn parse_count(raw: &str) -> u64 {
    let cleaned = raw.trim().replace(',', "");
    match cleaned.parse() {
        Ok(value) => value,
        Err(_) => {
            if !cleaned.is_empty() {
                warn!(raw, "Unparseable count in analytics row, defaulting to 0.");
            }
            0
        }
    }
}

// "HH:MM:SS" time-on-page values.
fn parse_clock(raw: &str) -> Duration {
    match RE_CLOCK.captures(raw.trim()) {
        Some(caps) => {
            let hours: u64 = caps[1].parse().unwrap_or(0);
            let minutes: u64 = caps[2].parse().unwrap_or(0);
            let seconds: u64 = caps[3].parse().unwrap_or(0);
            Duration::from_secs(hours * 3600 + minutes * 60 + seconds)
        }
        None => {
            if !raw.trim().is_empty() {
                warn!(raw, "Unparseable duration in analytics row, defaulting to 0.");
            }
            Duration::ZERO
        }
    }
}

// "NN.NN%" percentages in the 0-100 range.
fn parse_percent(raw: &str) -> f32 {
    let cleaned = raw.trim().trim_end_matches('%');
    match cleaned.parse() {
        Ok(value) => value,
        Err(_) => {
            if !cleaned.is_empty() {
                warn!(raw, "Unparseable percentage in analytics row, defaulting to 0.");
            }
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::DomainRecord;
    use std::io::Write;

    #[test]
    fn parses_counts_with_thousands_separators() {
        assert_eq!(parse_count("1,234"), 1234);
        assert_eq!(parse_count("12"), 12);
        assert_eq!(parse_count("1,234,567"), 1234567);
    }

    #[test]
    fn unparseable_count_defaults_to_zero() {
        assert_eq!(parse_count("n/a"), 0);
        assert_eq!(parse_count(""), 0);
    }

    #[test]
    fn parses_clock_durations() {
        assert_eq!(parse_clock("00:02:15"), Duration::from_secs(135));
        assert_eq!(parse_clock("01:00:00"), Duration::from_secs(3600));
        assert_eq!(parse_clock("garbage"), Duration::ZERO);
    }

    #[test]
    fn parses_percentages() {
        assert_eq!(parse_percent("45.20%"), 45.20);
        assert_eq!(parse_percent("0.00%"), 0.0);
        assert_eq!(parse_percent("not-a-number"), 0.0);
    }

    #[test]
    fn normalizes_one_trailing_slash() {
        assert_eq!(normalize_domain_key("example.com/"), "example.com");
        assert_eq!(normalize_domain_key("example.com"), "example.com");
        // Only one slash is stripped; anything beyond that is the caller's
        // data to keep.
        assert_eq!(normalize_domain_key("example.com//"), "example.com/");
    }

    #[test]
    fn loads_rows_and_tolerates_bad_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "domain,page_views,unique_views,avg_time_page,bounce_rate,exit_percentage"
        )
        .unwrap();
        writeln!(file, "example.com/,\"1,234\",987,00:02:15,45.20%,33.10%").unwrap();
        writeln!(file, "broken.example,oops,12,bad,nan%,50.00%").unwrap();

        let table = load_analytics(file.path()).expect("load analytics");
        assert_eq!(table.len(), 2);

        let good = &table["example.com"];
        assert_eq!(good.page_views, 1234);
        assert_eq!(good.unique_views, 987);
        assert_eq!(good.avg_time_page, Duration::from_secs(135));
        assert_eq!(good.bounce_rate, 45.20);
        assert_eq!(good.exit_percentage, 33.10);

        // Field-level failures degrade to zero without dropping the row.
        let broken = &table["broken.example"];
        assert_eq!(broken.page_views, 0);
        assert_eq!(broken.unique_views, 12);
        assert_eq!(broken.avg_time_page, Duration::ZERO);
        assert_eq!(broken.bounce_rate, 0.0);
        assert_eq!(broken.exit_percentage, 50.0);
    }

    #[test]
    fn merge_overwrites_all_fields_for_matching_domains_only() {
        let mut analytics = HashMap::new();
        analytics.insert(
            "known.example".to_string(),
            TrafficStats {
                page_views: 10,
                unique_views: 7,
                avg_time_page: Duration::from_secs(60),
                bounce_rate: 12.5,
                exit_percentage: 40.0,
            },
        );

        let records = vec![
            DomainRecord::new("known.example"),
            DomainRecord::new("unknown.example"),
        ];
        let merged = merge_traffic(records, &analytics);

        assert_eq!(merged[0].traffic.page_views, 10);
        assert_eq!(merged[0].traffic.unique_views, 7);
        assert_eq!(merged[0].traffic.avg_time_page, Duration::from_secs(60));
        assert_eq!(merged[0].traffic.bounce_rate, 12.5);
        assert_eq!(merged[0].traffic.exit_percentage, 40.0);

        assert_eq!(merged[1].traffic.page_views, 0);
        assert_eq!(merged[1].traffic.avg_time_page, Duration::ZERO);
    }
}
