// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare DNS provider for the DDNS updater.
//
// The provider is bound to one zone and one API token. Each trait method is a
// single HTTP round trip:
//
// - ✅ Bearer-token authentication and JSON bodies on every call
// - ✅ Non-success statuses surface the first message of the API's error list
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic (the engine tries again on its next tick)
// - ❌ NO caching (every tick starts from a fresh listing)
//
// ## Security Requirements
//
// - API token NEVER appears in logs
// - Provider MUST fail fast if token or zone is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Patch DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

pub mod models;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use ddns_core::traits::DnsProvider;
use ddns_core::{DdnsConfig, DnsRecord, Error, RecordRequest, Result};
use models::{ApiResponse, RecordPayload};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Identifier returned by `create_record` in dry-run mode
pub const DRY_RUN_RECORD_ID: &str = "dry-run";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Prefix of the comment written on every record this tool touches
const COMMENT_TAG: &str = "ddnsd";

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the record listing
/// - Log the intended POST/PATCH payload
/// - **NOT** actually modify DNS records
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone holding the managed record
    zone_id: String,

    /// API root, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, list records but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider in live mode
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `zone_id`: Zone holding the record
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if either value is empty or the HTTP client cannot be built.
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        let zone_id = zone_id.into();

        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }
        if zone_id.is_empty() {
            return Err(Error::config("Cloudflare zone ID cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            zone_id,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
            dry_run: false,
        })
    }

    /// Create a provider from the loaded configuration
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        let provider = Self::new(config.provider.api_token.clone(), config.provider.zone_id.clone())?
            .with_dry_run(config.engine.dry_run);

        if provider.dry_run {
            tracing::warn!("Cloudflare provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(provider)
    }

    /// Point the provider at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, self.zone_id)
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.records_url(), record_id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send a request and decode the response envelope, whatever the status
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<(StatusCode, ApiResponse<T>)> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        decode(response).await
    }

    fn payload<'a>(&self, request: &'a RecordRequest) -> RecordPayload<'a> {
        RecordPayload {
            name: &request.name,
            ttl: request.ttl,
            record_type: request.record_type(),
            comment: record_comment(),
            content: &request.content,
            proxied: request.proxied,
        }
    }
}

/// Read the whole body and deserialize it as an API envelope with result type `T`
pub async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<(StatusCode, ApiResponse<T>)> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

    let envelope = serde_json::from_slice(&body)?;
    Ok((status, envelope))
}

/// Comment tagging the record with this tool and the time of the write
fn record_comment() -> String {
    format!(
        "{} ({})",
        COMMENT_TAG,
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List the zone's records and return the first whose name matches exactly
    ///
    /// The listing is narrowed server-side with the `name` filter; the exact,
    /// case-sensitive comparison still happens here.
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=home.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn find_record(&self, name: &str) -> Result<Option<DnsRecord>> {
        let url = self.records_url();
        tracing::info!("Searching DNS record {}", name);

        let (status, response) = self
            .send::<Vec<DnsRecord>>(self.request(Method::GET, &url).query(&[("name", name)]))
            .await?;

        if status != StatusCode::OK {
            return Err(Error::api(status.as_u16(), response.error_messages()));
        }

        let records = response.result.unwrap_or_default();
        tracing::info!("Found {} DNS records", records.len());

        Ok(records.into_iter().find(|record| record.name == name))
    }

    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// {"name": ..., "ttl": ..., "type": "A", "comment": ..., "content": ..., "proxied": ...}
    /// ```
    async fn create_record(&self, request: &RecordRequest) -> Result<String> {
        let url = self.records_url();
        let payload = self.payload(request);

        tracing::info!(
            "Creating new Cloudflare DNS {} record for address {} -> {}",
            payload.record_type,
            payload.content,
            payload.name
        );

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                url,
                serde_json::to_string(&payload)?
            );
            return Ok(DRY_RUN_RECORD_ID.to_string());
        }

        let (status, response) = self
            .send::<DnsRecord>(self.request(Method::POST, &url).json(&payload))
            .await?;

        if status != StatusCode::OK {
            return Err(Error::api(status.as_u16(), response.error_messages()));
        }

        response
            .result
            .map(|record| record.id)
            .ok_or_else(|| Error::provider(self.provider_name(), "Invalid response format: missing result"))
    }

    /// ```http
    /// PATCH /zones/:zone_id/dns_records/:record_id
    /// ```
    ///
    /// A 200 whose envelope reports `success: false` yields `Ok(false)`; any
    /// other status is an error built like the create and list errors.
    async fn update_record(&self, request: &RecordRequest, record_id: &str) -> Result<bool> {
        let url = self.record_url(record_id);
        let payload = self.payload(request);

        tracing::info!(
            "Updating Cloudflare DNS {} record ({}) for address {} -> {}",
            payload.record_type,
            record_id,
            payload.content,
            payload.name
        );

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH request to {} with payload: {}",
                url,
                serde_json::to_string(&payload)?
            );
            return Ok(false);
        }

        let (status, response) = self
            .send::<DnsRecord>(self.request(Method::PATCH, &url).json(&payload))
            .await?;

        if status != StatusCode::OK {
            return Err(Error::api(status.as_u16(), response.error_messages()));
        }

        if !response.success {
            tracing::warn!(
                "Cloudflare accepted the update of {} but reported success=false",
                record_id
            );
        }
        Ok(response.success)
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
