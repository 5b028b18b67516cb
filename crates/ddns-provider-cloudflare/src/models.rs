//! Cloudflare API v4 wire types
//!
//! Every response shares the same envelope; only `result` changes shape
//! between endpoints (one record for create/update, a list for listing).

use ddns_core::RecordType;
use serde::{Deserialize, Serialize};

/// Response envelope returned by every Cloudflare API call
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    /// Absent or null on most failures
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Error messages in the order the API listed them
    pub fn error_messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.message.as_str())
    }
}

/// One entry of the `errors` or `messages` list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
    /// Which request field the message is about
    #[serde(default)]
    pub source: Option<ApiSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSource {
    #[serde(default)]
    pub pointer: String,
}

/// Body of the create (POST) and update (PATCH) calls
#[derive(Debug, Clone, Serialize)]
pub struct RecordPayload<'a> {
    pub name: &'a str,
    pub ttl: u32,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub comment: String,
    pub content: &'a str,
    pub proxied: bool,
}
