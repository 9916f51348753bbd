// src/core/probe/tls_probe.rs

use chrono::{DateTime, Utc};
use native_tls::{TlsConnector, TlsStream};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tokio::task::spawn_blocking;
use tracing::{debug, error};
use x509_parser::prelude::*;

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Checks whether a TLS handshake with the domain on port 443 succeeds under
/// default trust validation.
///
/// native-tls is blocking, so the handshake runs on a blocking task. Every
/// failure mode (no address, connect timeout, handshake rejection) yields
/// `false`. The certificate itself is not retained; on success its details
/// are logged at debug level only.
pub async fn check_certificate(domain: &str) -> bool {
    debug!(domain, "Probing TLS certificate on port 443.");
    let target = domain.to_string();

    let outcome = spawn_blocking(move || perform_tls_handshake(&target)).await;

    match outcome {
        Ok(Ok(())) => {
            debug!(domain, "TLS handshake succeeded.");
            true
        }
        Ok(Err(e)) => {
            debug!(domain, error = %e, "TLS handshake failed.");
            false
        }
        Err(e) => {
            error!(domain, panic = %e, "Blocking TLS probe task panicked!");
            false
        }
    }
}

fn perform_tls_handshake(domain: &str) -> Result<(), String> {
    let connector = TlsConnector::new().map_err(|e| format!("TlsConnector error: {}", e))?;

    let addr = (domain, 443)
        .to_socket_addrs()
        .map_err(|e| format!("Address resolution error: {}", e))?
        .next()
        .ok_or_else(|| "No address for domain".to_string())?;

    let stream = TcpStream::connect_timeout(&addr, HANDSHAKE_TIMEOUT)
        .map_err(|e| format!("TCP connection error: {}", e))?;
    stream
        .set_read_timeout(Some(HANDSHAKE_TIMEOUT))
        .map_err(|e| format!("Socket configuration error: {}", e))?;
    stream
        .set_write_timeout(Some(HANDSHAKE_TIMEOUT))
        .map_err(|e| format!("Socket configuration error: {}", e))?;

    let stream = connector
        .connect(domain, stream)
        .map_err(|e| format!("TLS handshake error: {}", e))?;

    log_certificate_details(domain, &stream);
    Ok(())
}

// The probe is pass/fail, but the accepted certificate's identity and expiry
// are worth having in the log when a run needs auditing.
fn log_certificate_details(domain: &str, stream: &TlsStream<TcpStream>) {
    let cert = match stream.peer_certificate() {
        Ok(Some(cert)) => cert,
        Ok(None) => {
            debug!(domain, "Handshake succeeded but no peer certificate was provided.");
            return;
        }
        Err(e) => {
            debug!(domain, error = %e, "Could not retrieve peer certificate.");
            return;
        }
    };

    let der = match cert.to_der() {
        Ok(der) => der,
        Err(e) => {
            debug!(domain, error = %e, "Could not convert certificate to DER.");
            return;
        }
    };

    if let Ok((_, x509)) = parse_x509_certificate(&der) {
        let not_after = asn1_time_to_chrono_utc(&x509.validity().not_after);
        let days_left = not_after.signed_duration_since(Utc::now()).num_days();
        debug!(
            domain,
            subject = %x509.subject(),
            issuer = %x509.issuer(),
            days_left,
            "Peer certificate accepted."
        );
    }
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}
