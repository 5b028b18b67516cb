//! Test doubles and common utilities for engine contract tests
//!
//! The doubles record every call so tests can assert on exactly what the
//! engine asked for, without any network.

#![allow(dead_code)]

use ddns_core::config::{DdnsConfig, EngineConfig, IpSourceConfig, ProviderConfig, RecordConfig};
use ddns_core::error::{Error, Result};
use ddns_core::record::{DnsRecord, RecordRequest};
use ddns_core::traits::{DnsProvider, IpSource};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource that replays scripted answers, then repeats a fallback IP
#[derive(Clone)]
pub struct ScriptedIpSource {
    script: Arc<Mutex<VecDeque<Result<String>>>>,
    fallback: String,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    /// Always answers `ip`
    pub fn fixed(ip: &str) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: ip.to_string(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answers from `script` in order, then `fallback` forever
    pub fn scripted(script: Vec<Result<String>>, fallback: &str) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            fallback: fallback.to_string(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(answer) => answer,
            None => Ok(self.fallback.clone()),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A call received by [`MockDnsProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Find(String),
    Create(RecordRequest),
    Update(RecordRequest, String),
}

/// A DnsProvider backed by an in-memory zone that records every call
///
/// Creating a record inserts it into the zone and updating rewrites it, so a
/// sequence of ticks sees the effect of earlier ones, as against a real zone.
#[derive(Clone)]
pub struct MockDnsProvider {
    zone: Arc<Mutex<Vec<DnsRecord>>>,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    /// Status to fail find_record with, if any
    fail_find: Arc<Mutex<Option<u16>>>,
    /// Status to fail update_record with, if any
    fail_update: Arc<Mutex<Option<u16>>>,
    /// What update_record reports when it does not fail
    update_applies: bool,
    next_id: Arc<AtomicUsize>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            zone: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_find: Arc::new(Mutex::new(None)),
            fail_update: Arc::new(Mutex::new(None)),
            update_applies: true,
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Start with `records` already in the zone
    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        let provider = Self::new();
        *provider.zone.lock().unwrap() = records;
        provider
    }

    /// Make update_record report "not applied" instead of success
    pub fn with_unapplied_updates(mut self) -> Self {
        self.update_applies = false;
        self
    }

    pub fn fail_find_with(&self, status: Option<u16>) {
        *self.fail_find.lock().unwrap() = status;
    }

    pub fn fail_update_with(&self, status: Option<u16>) {
        *self.fail_update.lock().unwrap() = status;
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<RecordRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Create(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn update_calls(&self) -> Vec<(RecordRequest, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Update(request, id) => Some((request, id)),
                _ => None,
            })
            .collect()
    }

    pub fn zone(&self) -> Vec<DnsRecord> {
        self.zone.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn find_record(&self, name: &str) -> Result<Option<DnsRecord>> {
        self.calls.lock().unwrap().push(ProviderCall::Find(name.to_string()));
        if let Some(status) = *self.fail_find.lock().unwrap() {
            return Err(Error::api(status, ["Authentication error"].into_iter()));
        }
        Ok(self.zone.lock().unwrap().iter().find(|r| r.name == name).cloned())
    }

    async fn create_record(&self, request: &RecordRequest) -> Result<String> {
        self.calls.lock().unwrap().push(ProviderCall::Create(request.clone()));
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.zone.lock().unwrap().push(record_from(&id, request));
        Ok(id)
    }

    async fn update_record(&self, request: &RecordRequest, record_id: &str) -> Result<bool> {
        self.calls
            .lock()
            .unwrap()
            .push(ProviderCall::Update(request.clone(), record_id.to_string()));
        if let Some(status) = *self.fail_update.lock().unwrap() {
            return Err(Error::api(status, ["Record does not exist."].into_iter()));
        }
        if !self.update_applies {
            return Ok(false);
        }
        let mut zone = self.zone.lock().unwrap();
        if let Some(existing) = zone.iter_mut().find(|r| r.id == record_id) {
            *existing = record_from(record_id, request);
        }
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

fn record_from(id: &str, request: &RecordRequest) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: request.name.clone(),
        record_type: request.record_type().to_string(),
        content: request.content.clone(),
        ttl: request.ttl,
        proxied: request.proxied,
        ..DnsRecord::default()
    }
}

/// A record as the provider would list it
pub fn existing_record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: ddns_core::RecordType::from_content(content).to_string(),
        content: content.to_string(),
        ttl: 3600,
        ..DnsRecord::default()
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(record_name: &str) -> DdnsConfig {
    DdnsConfig {
        provider: ProviderConfig {
            api_token: "test-token".to_string(),
            zone_id: "test-zone".to_string(),
        },
        record: RecordConfig {
            name: record_name.to_string(),
            ttl: 3600,
            proxied: false,
        },
        ip_source: IpSourceConfig {
            url: "https://ifconfig.me/ip".to_string(),
        },
        engine: EngineConfig {
            interval_minutes: 5,
            skip_unchanged: false,
            dry_run: false,
        },
        log_level: "info".to_string(),
    }
}
