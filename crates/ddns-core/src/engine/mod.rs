//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Asking the IpSource for the current public IP
//! - Looking up the managed record via the DnsProvider
//! - Creating the record if it is absent, updating it otherwise
//! - Sleeping for the configured interval and starting over
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   current()   ┌──────────────┐  find / create / update  ┌─────────────┐
//! │  IpSource   │ ◄──────────── │  DdnsEngine  │ ───────────────────────► │ DnsProvider │
//! └─────────────┘               └──────────────┘                          └─────────────┘
//!                                      │
//!                                      ▼
//!                                sleep(interval)
//! ```
//!
//! ## Tick Flow
//!
//! 1. Resolve the current IP; on failure the tick ends here
//! 2. Find the record by name
//! 3. Absent → create it; present → update it with the record's identifier
//! 4. Sleep, repeat
//!
//! Nothing is carried from one tick to the next. A failed tick is retried by
//! the next one; there is no other retry.

use crate::config::DdnsConfig;
use crate::error::Result;
use crate::record::RecordRequest;
use crate::traits::{DnsProvider, IpSource};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What a successful tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The record did not exist and was created
    Created {
        /// Identifier assigned by the provider
        id: String,
    },

    /// The record existed and an update was sent
    Updated {
        /// Identifier of the existing record
        id: String,
        /// Whether the provider reported the update as applied
        applied: bool,
    },

    /// The record already pointed at the current IP and the update was skipped
    ///
    /// Only produced when `skip_unchanged` is enabled.
    Unchanged {
        /// Identifier of the existing record
        id: String,
    },
}

/// Core DDNS engine
///
/// Owns the reconciliation loop for a single record. Ticks run strictly one
/// after another; no tick starts before the previous one and the following
/// sleep have finished.
pub struct DdnsEngine {
    /// IP source for discovering the public address
    ip_source: Box<dyn IpSource>,

    /// DNS provider holding the record
    provider: Box<dyn DnsProvider>,

    /// Managed record name
    record_name: String,

    /// TTL written on create/update
    ttl: u32,

    /// Proxied flag written on create/update
    proxied: bool,

    /// Time between ticks
    interval: Duration,

    /// Skip the update when the record already holds the current IP
    skip_unchanged: bool,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Loaded configuration; record settings and interval are copied out of it
    pub fn new(ip_source: Box<dyn IpSource>, provider: Box<dyn DnsProvider>, config: &DdnsConfig) -> Self {
        Self {
            ip_source,
            provider,
            record_name: config.record.name.clone(),
            ttl: config.record.ttl,
            proxied: config.record.proxied,
            interval: config.engine.interval(),
            skip_unchanged: config.engine.skip_unchanged,
        }
    }

    /// Override the time between ticks
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Time between ticks
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(TickOutcome)`: What was done to the record
    /// - `Err(Error)`: The first failure; later steps of the tick were not attempted
    pub async fn tick(&self) -> Result<TickOutcome> {
        let ip = self.ip_source.current().await?;
        info!("Your IP address is {}", ip);

        let request = RecordRequest::new(self.record_name.clone(), ip, self.ttl, self.proxied);

        let Some(existing) = self.provider.find_record(&self.record_name).await? else {
            info!("DNS record {} not found, creating it", self.record_name);
            let id = self.provider.create_record(&request).await?;
            info!("DNS record successfully created with id: {}", id);
            return Ok(TickOutcome::Created { id });
        };

        info!("DNS record {} found (id: {})", self.record_name, existing.id);

        if self.skip_unchanged && existing.content == request.content {
            info!(
                "DNS record {} already points to {}, skipping update",
                self.record_name, request.content
            );
            return Ok(TickOutcome::Unchanged { id: existing.id });
        }

        let applied = self.provider.update_record(&request, &existing.id).await?;
        if applied {
            info!("DNS record successfully updated!");
        } else {
            warn!("DNS record {} not updated", self.record_name);
        }

        Ok(TickOutcome::Updated {
            id: existing.id,
            applied,
        })
    }

    /// Run the loop until `shutdown` resolves
    ///
    /// The first tick starts immediately. A failed tick is logged and the loop
    /// carries on after the usual interval. Shutdown is honored at any point,
    /// including in the middle of a tick.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting DDNS engine for {} via {} (interval: {:?})",
            self.record_name,
            self.provider.provider_name(),
            self.interval
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = self.tick_and_wait() => {}

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("DDNS engine stopped");
    }

    async fn tick_and_wait(&self) {
        match self.tick().await {
            Ok(outcome) => debug!("Tick finished: {:?}", outcome),
            Err(e) => error!("Failed to reconcile {}: {}", self.record_name, e),
        }
        tokio::time::sleep(self.interval).await;
    }
}
