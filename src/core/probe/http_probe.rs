// src/core/probe/http_probe.rs

use reqwest::Client;
use tracing::debug;

/// Checks whether a URL answers with a success status.
///
/// Returns `true` iff the request completes without a transport-level error
/// and the response status is in [200, 300). The client does not follow
/// redirects, so a redirecting site does not count as answering. Any
/// transport failure (DNS, refused connection, timeout) yields `false`; a
/// probe never aborts the run.
pub async fn check_url(url: &str, client: &Client) -> bool {
    debug!(url, "Probing for a direct answer.");

    match client.get(url).send().await {
        Ok(response) => {
            let answers = response.status().is_success();
            debug!(url, status = %response.status(), answers, "Probe completed.");
            answers
        }
        Err(e) => {
            debug!(url, error = %e, "Probe failed at transport level.");
            false
        }
    }
}
