// src/core/probe/mod.rs

// Public interface of the `probe` module: one sub-module per network check
// plus the per-domain orchestration that joins them.
pub mod http_probe;
pub mod redirect_probe;
pub mod tls_probe;

use std::time::Duration;

use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use reqwest::redirect::Policy;

use self::http_probe::check_url;
use self::redirect_probe::check_redirect;
use self::tls_probe::check_certificate;
use crate::core::models::ProbeOutcome;

pub const USER_AGENT: &str = "BeaconRS/0.1";

/// Network clients shared by every probe task. Built once per run; both the
/// reqwest client and the resolver are cheap to share across tasks.
pub struct ProbeClients {
    // Status probes never follow redirects: a redirect is a terminal,
    // reported condition for them.
    pub http: reqwest::Client,
    pub resolver: TokioAsyncResolver,
}

impl ProbeClients {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

        Ok(Self { http, resolver })
    }
}

/// Runs the four reachability checks for a single domain in parallel and
/// aggregates them into a `ProbeOutcome`.
///
/// `tokio::join!` is the barrier here: every check resolves, success or
/// failure, before the outcome is assembled, and none of them observes
/// another's partial result. All four always run, even for domains whose
/// HTTP probe is doomed to fail.
pub async fn run_domain_probe(domain: &str, clients: &ProbeClients) -> ProbeOutcome {
    let http_url = format!("http://{}/", domain);
    let https_url = format!("https://{}/", domain);

    let (answers_http, redirects_to_https, answers_https, valid_certificate) = tokio::join!(
        check_url(&http_url, &clients.http),
        check_redirect(&http_url, &clients.http, &clients.resolver),
        check_url(&https_url, &clients.http),
        check_certificate(domain),
    );

    ProbeOutcome {
        answers_http,
        redirects_to_https,
        answers_https,
        valid_certificate,
    }
}
