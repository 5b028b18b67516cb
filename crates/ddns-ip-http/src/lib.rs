// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS updater.
//
// ## Architecture
//
// Fetches the current IP from an external echo service (e.g. ifconfig.me,
// icanhazip.com) that answers a plain GET with the caller's address as the
// response body. One request per call; the engine decides when to call.

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Default HTTP timeout for echo requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://ifconfig.me/ip")
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Turn an echo-service body into record content
///
/// Surrounding whitespace is dropped (many services end the body with a
/// newline). Whatever remains must be an IP address.
fn parse_body(body: &str) -> Result<String> {
    let ip_text = body.trim();

    if ip_text.is_empty() {
        return Err(Error::ip_source("Empty response body"));
    }

    ip_text
        .parse::<IpAddr>()
        .map_err(|_| Error::ip_source(format!("Invalid IP address: {}", ip_text)))?;

    Ok(ip_text.to_string())
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        tracing::info!("Looking for IP address...");
        tracing::debug!("Querying {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request failed: {}", e)))?;

        // The body is used regardless of status; a bad one fails parsing below
        if !response.status().is_success() {
            tracing::warn!("IP echo service answered with HTTP {}", response.status());
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        parse_body(&body)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
