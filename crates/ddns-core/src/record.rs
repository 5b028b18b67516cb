//! DNS record model
//!
//! A [`DnsRecord`] is a read-only snapshot of what the provider holds, fetched
//! at the start of each tick and dropped at the end of it. A [`RecordRequest`]
//! is the state the engine wants the provider to hold.

use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record type managed by the updater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    #[serde(rename = "A")]
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Derive the record type from the address that will become its content
    ///
    /// Two or more colons mean IPv6, anything else is treated as IPv4.
    pub fn from_content(ip: &str) -> Self {
        if ip.matches(':').count() >= 2 {
            RecordType::Aaaa
        } else {
            RecordType::A
        }
    }

    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-record address family restrictions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSettings {
    #[serde(default)]
    pub ipv4_only: bool,
    #[serde(default)]
    pub ipv6_only: bool,
}

/// Snapshot of a record as returned by the provider
///
/// Only `id` and `name` are needed by the engine; every other field defaults
/// when the provider leaves it out. `record_type` stays a string because the
/// zone may hold types this updater never writes (CNAME, TXT, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned identifier
    pub id: String,
    /// Fully qualified record name
    pub name: String,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: RecordSettings,
}

/// Desired state of the managed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRequest {
    pub name: String,
    /// IP address the record should point at
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

impl RecordRequest {
    pub fn new(name: impl Into<String>, content: impl Into<String>, ttl: u32, proxied: bool) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ttl,
            proxied,
        }
    }

    /// Record type implied by the content
    pub fn record_type(&self) -> RecordType {
        RecordType::from_content(&self.content)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
