// src/core/probe/redirect_probe.rs

use hickory_resolver::TokioAsyncResolver;
use reqwest::Client;
use tracing::debug;
use url::Url;

// The permanent and temporary redirect codes the probe reports on.
const REDIRECT_CODES: [u16; 4] = [301, 302, 307, 308];

/// Checks whether an HTTP URL answers with a redirect status.
///
/// The host is resolved first: an unresolvable host cannot be said to
/// redirect, so the probe reports `false` without issuing the request.
/// Otherwise the result is `true` iff the response status is one of
/// 301/302/307/308. The response is only inspected when the request itself
/// succeeded; transport failures yield `false`.
pub async fn check_redirect(url: &str, client: &Client, resolver: &TokioAsyncResolver) -> bool {
    let host = match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_string(),
            None => {
                debug!(url, "URL has no host, treating as no redirect.");
                return false;
            }
        },
        Err(e) => {
            debug!(url, error = %e, "Unparseable URL, treating as no redirect.");
            return false;
        }
    };

    if let Err(e) = resolver.lookup_ip(host.as_str()).await {
        debug!(url, host = %host, error = %e, "Host did not resolve, treating as no redirect.");
        return false;
    }

    match client.get(url).send().await {
        Ok(response) => {
            let redirects = REDIRECT_CODES.contains(&response.status().as_u16());
            debug!(url, status = %response.status(), redirects, "Redirect probe completed.");
            redirects
        }
        Err(e) => {
            debug!(url, error = %e, "Redirect probe failed at transport level.");
            false
        }
    }
}
