//! Core traits for the DDNS updater
//!
//! This module defines the abstract interfaces the engine drives.
//!
//! - [`IpSource`]: Discover the current public IP address
//! - [`DnsProvider`]: Look up, create and update DNS records via a provider API

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::DnsProvider;
