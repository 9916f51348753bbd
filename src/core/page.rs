// src/core/page.rs

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::core::models::PageContent;

/// Fetches a landing page and extracts its title, first h1 and all h2 texts.
///
/// Only the transport leg can fail here: the HTML parser is error-recovering,
/// so a malformed or non-HTML body simply produces empty fields. The caller
/// decides what a failed fetch means for its record.
pub async fn fetch_page(url: &str, client: &Client) -> Result<PageContent, String> {
    info!(url, "Fetching page for scraping.");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    debug!(url, status = %response.status(), "Received page response.");

    let body = response
        .text()
        .await
        .map_err(|e| format!("Could not read response body: {}", e))?;

    Ok(scrape_page(&body))
}

/// Extracts the scraped fields from an HTML body.
///
/// h2 entries keep document order. Element texts are concatenated across
/// inline children and whitespace-trimmed.
pub fn scrape_page(body: &str) -> PageContent {
    let doc = Html::parse_document(body);
    let mut content = PageContent::default();

    if let Ok(selector) = Selector::parse("title") {
        if let Some(element) = doc.select(&selector).next() {
            content.title = element_text(&element);
        }
    }

    if let Ok(selector) = Selector::parse("h1") {
        if let Some(element) = doc.select(&selector).next() {
            content.h1_text = element_text(&element);
        }
    }

    if let Ok(selector) = Selector::parse("h2") {
        for element in doc.select(&selector) {
            content.h2_text.push(element_text(&element));
        }
    }

    content
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::scrape_page;

    #[test]
    fn extracts_title_first_h1_and_all_h2() {
        let body = r#"<html><head><title>Acme Corp</title></head><body>
            <h1>Welcome</h1>
            <h1>Second heading is ignored</h1>
            <h2>Products</h2>
            <h2>About <em>us</em></h2>
            </body></html>"#;

        let content = scrape_page(body);
        assert_eq!(content.title, "Acme Corp");
        assert_eq!(content.h1_text, "Welcome");
        assert_eq!(content.h2_text, vec!["Products", "About us"]);
    }

    #[test]
    fn h2_entries_keep_document_order() {
        let body = "<h2>one</h2><h2>two</h2><h2>three</h2>";
        let content = scrape_page(body);
        assert_eq!(content.h2_text, vec!["one", "two", "three"]);
    }

    #[test]
    fn non_html_body_yields_empty_fields() {
        let content = scrape_page("{\"not\": \"html\"}");
        assert!(content.title.is_empty());
        assert!(content.h1_text.is_empty());
        assert!(content.h2_text.is_empty());
    }

    #[test]
    fn missing_elements_stay_empty() {
        let content = scrape_page("<html><body><p>no headings here</p></body></html>");
        assert!(content.title.is_empty());
        assert!(content.h1_text.is_empty());
        assert!(content.h2_text.is_empty());
    }
}
