// # DNS Provider Trait
//
// Defines the interface for managing one DNS record via a provider API.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, RecordRequest};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     let request = RecordRequest::new("home.example.com", "203.0.113.7", 3600, false);
//
//     match provider.find_record(&request.name).await? {
//         Some(record) => { provider.update_record(&request, &record.id).await?; }
//         None => { provider.create_record(&request).await?; }
//     }
//
//     Ok(())
// }
// ```

use crate::record::{DnsRecord, RecordRequest};
use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// Each method is a single round trip to the provider. Implementations are
/// bound to one zone and one set of credentials at construction time.
///
/// ## Forbidden Capabilities
/// - ❌ Implement retry logic or backoff (the engine retries on its next tick)
/// - ❌ Cache records between calls
/// - ❌ Decide whether an update is needed (owned by `DdnsEngine`)
///
/// Any non-success status from the provider must surface as
/// [`Error::Api`](crate::Error::Api) carrying the provider's first error message.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Find a record by exact, case-sensitive name
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: The first record whose name matches
    /// - `Ok(None)`: No record with that name exists in the zone
    /// - `Err(Error)`: If the lookup failed
    async fn find_record(&self, name: &str) -> Result<Option<DnsRecord>, crate::Error>;

    /// Create a record
    ///
    /// # Returns
    ///
    /// The provider-assigned identifier of the new record
    async fn create_record(&self, request: &RecordRequest) -> Result<String, crate::Error>;

    /// Overwrite an existing record identified by `record_id`
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The provider applied the update
    /// - `Ok(false)`: The request was accepted but nothing was applied
    /// - `Err(Error)`: If the update was rejected or failed
    async fn update_record(&self, request: &RecordRequest, record_id: &str) -> Result<bool, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
