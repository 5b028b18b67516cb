// # ddns-core
//
// Core library for the periodic DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping one DNS record
// pointed at the host's public IP:
// - **IpSource**: Trait for discovering the current public IP
// - **DnsProvider**: Trait for finding, creating and updating the record via a provider API
// - **DdnsEngine**: Reconciliation loop (resolve → look up → create or update → sleep)
// - **DdnsConfig**: Environment-driven configuration, loaded once at startup
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP implementations
// 2. **Stateless Ticks**: Every tick starts from a fresh lookup, nothing is cached
// 3. **Library-First**: The loop can be embedded and driven tick by tick

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod record;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider};
pub use engine::{DdnsEngine, TickOutcome};
pub use config::{DdnsConfig, EngineConfig, IpSourceConfig, ProviderConfig, RecordConfig};
pub use error::{Error, Result};
pub use record::{DnsRecord, RecordRequest, RecordSettings, RecordType};
