// src/probe/http.rs
// =============================================================================
// This module sends the actual HTTP request for a URL and reduces whatever
// happens to a ProbeOutcome.
//
// Key functionality:
// - Builds the one HTTP client shared by every worker
// - Sends exactly one GET request per probe with "Connection: close"
// - Never fails: network, DNS, TLS and URL errors become Unreachable
// - Categorizes the failure so verbose logs can say what went wrong
//
// Certificates are NOT validated. We want to know if a host answers, not
// whether we trust it.
//
// Rust concepts:
// - Enums with data: Unreachable carries a FailureKind
// - async/await: The request waits on the network without blocking a thread
// - Error source chains: reqwest wraps the real cause inside its own error
// =============================================================================

use anyhow::{Context, Result};
use log::{debug, trace};
use reqwest::header::CONNECTION;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;
use url::Url;

// Upper bound for TCP connect plus TLS handshake, taken together
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// How many redirects the client follows before giving up
const MAX_REDIRECTS: usize = 10;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Why a probe could not produce a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The URL could not be parsed into a request
    InvalidUrl,
    /// Could not resolve hostname
    Dns,
    /// TCP connection refused, reset or unreachable
    Connect,
    /// TLS handshake failed
    Tls,
    /// TCP connect plus TLS handshake took longer than CONNECT_TIMEOUT
    Timeout,
    /// Anything else the client reported (redirect loop, broken response...)
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureKind::InvalidUrl => "invalid url",
            FailureKind::Dns => "dns error",
            FailureKind::Connect => "connection failed",
            FailureKind::Tls => "tls error",
            FailureKind::Timeout => "timeout",
            FailureKind::Other => "request error",
        };
        f.write_str(text)
    }
}

// The result of probing one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered with this HTTP status code
    Status(u16),
    /// The request could not be completed
    Unreachable(FailureKind),
}

impl ProbeOutcome {
    /// The HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeOutcome::Status(code) => Some(*code),
            ProbeOutcome::Unreachable(_) => None,
        }
    }
}

// Builds the HTTP client that every worker shares
//
// Settings:
// - Invalid and self-signed certificates are accepted
// - TCP connect plus TLS handshake is limited to CONNECT_TIMEOUT
// - No overall request timeout, a slow server can keep a worker busy
// - No idle connections are kept, every request closes its connection
// - HTTP_PROXY / HTTPS_PROXY are ignored, every probe goes straight to the host
pub fn build_client() -> Result<Client> {
    Client::builder()
        .danger_accept_invalid_certs(true)
        .connect_timeout(CONNECT_TIMEOUT)
        .no_proxy()
        .redirect(Policy::limited(MAX_REDIRECTS))
        .pool_max_idle_per_host(0)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")
}

// Probes a single absolute URL with one GET request
//
// Parameters:
//   client: the shared client (borrowed, it is used by many workers)
//   url: an absolute URL, scheme included
//
// Returns: Status(code) if the server answered, Unreachable(kind) otherwise
pub async fn probe(client: &Client, url: &str) -> ProbeOutcome {
    // Reject malformed URLs before handing them to the client
    if let Err(e) = Url::parse(url) {
        debug!("Cannot build request for {url}: {e}");
        return ProbeOutcome::Unreachable(FailureKind::InvalidUrl);
    }

    let result = client.get(url).header(CONNECTION, "close").send().await;

    match result {
        Ok(response) => {
            let status = response.status().as_u16();
            trace!("{url} answered {status}");
            // Dropping the response releases the body and its connection
            drop(response);
            ProbeOutcome::Status(status)
        }
        Err(e) => {
            let kind = categorize_error(&e);
            debug!("{url} unreachable ({kind}): {}", error_chain(&e));
            ProbeOutcome::Unreachable(kind)
        }
    }
}

// Works out which FailureKind a reqwest error belongs to
//
// reqwest only exposes a few is_*() helpers, so DNS and TLS problems are
// recognized from the text of the wrapped errors.
fn categorize_error(error: &reqwest::Error) -> FailureKind {
    let chain = error_chain(error).to_lowercase();

    if error.is_builder() {
        FailureKind::InvalidUrl
    } else if error.is_timeout() {
        FailureKind::Timeout
    } else if chain.contains("dns") || chain.contains("failed to lookup address") {
        FailureKind::Dns
    } else if chain.contains("certificate")
        || chain.contains("tls")
        || chain.contains("ssl")
        || chain.contains("handshake")
    {
        FailureKind::Tls
    } else if error.is_connect() {
        FailureKind::Connect
    } else {
        FailureKind::Other
    }
}

// Joins an error and all of its sources into one line
fn error_chain(error: &reqwest::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
