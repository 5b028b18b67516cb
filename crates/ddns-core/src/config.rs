//! Configuration types for the DDNS updater
//!
//! Configuration comes from the process environment and is read exactly once,
//! at startup. The loaded [`DdnsConfig`] is immutable for the life of the
//! process and is passed by reference to whatever needs it.

use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Cloudflare API token (required)
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
/// Cloudflare zone identifier (required)
pub const ENV_ZONE_ID: &str = "CLOUDFLARE_ZONE_ID";
/// Fully qualified name of the managed record (required)
pub const ENV_RECORD_NAME: &str = "CLOUDFLARE_RECORD_NAME";
/// Record TTL in seconds
pub const ENV_RECORD_TTL: &str = "CLOUDFLARE_RECORD_TTL";
/// Whether the record is proxied through Cloudflare
pub const ENV_RECORD_PROXY: &str = "CLOUDFLARE_RECORD_PROXY";
/// Minutes between reconciliation ticks
pub const ENV_REFRESH_INTERVAL: &str = "REFRESH_INTERVAL";
/// IP echo service URL
pub const ENV_IP_SOURCE_URL: &str = "DDNS_IP_SOURCE_URL";
/// Skip the update when the record already holds the current IP
pub const ENV_SKIP_UNCHANGED: &str = "DDNS_SKIP_UNCHANGED";
/// `live` or `dry-run`
pub const ENV_MODE: &str = "DDNS_MODE";
/// Log verbosity
pub const ENV_LOG_LEVEL: &str = "DDNS_LOG_LEVEL";

pub const DEFAULT_RECORD_TTL: u32 = 3600;
pub const DEFAULT_REFRESH_INTERVAL_MINUTES: u64 = 5;
pub const DEFAULT_IP_SOURCE_URL: &str = "https://ifconfig.me/ip";
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main DDNS configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdnsConfig {
    /// DNS provider credentials and scope
    pub provider: ProviderConfig,

    /// The single record to keep in sync
    pub record: RecordConfig,

    /// Where the public IP comes from
    pub ip_source: IpSourceConfig,

    /// Loop behavior
    pub engine: EngineConfig,

    /// Log verbosity (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Provider credentials and zone
///
/// Both values are opaque to the updater; they are only checked for presence.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// API token, sent as a bearer credential
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// Zone holding the record
    pub zone_id: String,
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .finish()
    }
}

/// DNS record configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConfig {
    /// DNS record name, matched exactly against the provider's records
    pub name: String,

    /// Time-to-live in seconds
    pub ttl: u32,

    /// Whether the provider should proxy traffic for this record
    pub proxied: bool,
}

/// IP source configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpSourceConfig {
    /// Echo service returning the caller's address as the response body
    pub url: String,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minutes between ticks
    pub interval_minutes: u64,

    /// Skip the update call when the record content already equals the current IP
    ///
    /// Off by default: every tick that finds the record issues an update.
    pub skip_unchanged: bool,

    /// Perform lookups but only log the writes that would have been made
    pub dry_run: bool,
}

impl EngineConfig {
    /// Time to sleep between ticks
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }
}

impl DdnsConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let required = |key: &str| get(key).ok_or_else(|| Error::config(format!("missing '{}' env", key)));

        let api_token = required(ENV_API_TOKEN)?;
        let zone_id = required(ENV_ZONE_ID)?;
        let name = required(ENV_RECORD_NAME)?;

        let ttl = match get(ENV_RECORD_TTL) {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| Error::config(format!("Invalid {} value: {}", ENV_RECORD_TTL, value)))?,
            None => DEFAULT_RECORD_TTL,
        };

        let proxied = get(ENV_RECORD_PROXY).is_some_and(|value| parse_bool(&value));

        let interval_minutes = match get(ENV_REFRESH_INTERVAL) {
            Some(value) => {
                let minutes = value.trim().parse::<u64>().map_err(|_| {
                    Error::config(format!("Invalid {} value: {}", ENV_REFRESH_INTERVAL, value))
                })?;
                if minutes == 0 {
                    return Err(Error::config(format!("{} must be at least 1 minute", ENV_REFRESH_INTERVAL)));
                }
                minutes
            }
            None => DEFAULT_REFRESH_INTERVAL_MINUTES,
        };

        let url = get(ENV_IP_SOURCE_URL).unwrap_or_else(|| DEFAULT_IP_SOURCE_URL.to_string());
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(Error::config(format!(
                "{} must use HTTP or HTTPS scheme. Got: {}",
                ENV_IP_SOURCE_URL, url
            )));
        }

        let skip_unchanged = get(ENV_SKIP_UNCHANGED).is_some_and(|value| parse_bool(&value));

        let dry_run = match get(ENV_MODE).map(|mode| mode.to_lowercase()) {
            None => false,
            Some(mode) if mode == "live" => false,
            Some(mode) if mode == "dry-run" => true,
            Some(mode) => {
                return Err(Error::config(format!(
                    "{} '{}' is not valid. Valid modes: live, dry-run",
                    ENV_MODE, mode
                )));
            }
        };

        let log_level = get(ENV_LOG_LEVEL)
            .map(|level| level.to_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(Error::config(format!(
                "{} '{}' is not valid. Valid levels: {}",
                ENV_LOG_LEVEL,
                log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(Self {
            provider: ProviderConfig { api_token, zone_id },
            record: RecordConfig { name, ttl, proxied },
            ip_source: IpSourceConfig { url },
            engine: EngineConfig {
                interval_minutes,
                skip_unchanged,
                dry_run,
            },
            log_level,
        })
    }
}

/// Lenient boolean parsing: recognized true spellings are true, everything else is false
fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "t" | "T" | "true" | "TRUE" | "True")
}
