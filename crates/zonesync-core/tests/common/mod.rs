//! Test doubles and common utilities for engine contract tests
//!
//! The doubles are cloneable with shared counters so a test can hand a
//! clone to the engine and inspect call counts on its own copy.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use zonesync_core::error::{Error, Result};
use zonesync_core::traits::{DnsProvider, DnsRecord, PublicIp, PublicIpResolver};

/// A resolver scripted to return a fixed IP or fail
#[derive(Clone)]
pub struct ScriptedResolver {
    /// IP to return; `None` simulates an echo-service outage
    response: Option<String>,
    /// Call counter for resolve()
    resolve_calls: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    /// A resolver that always returns the given address
    pub fn returning(ip: &str) -> Self {
        Self {
            response: Some(ip.to_string()),
            resolve_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A resolver that always fails
    pub fn failing() -> Self {
        Self {
            response: None,
            resolve_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times resolve() was called
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PublicIpResolver for ScriptedResolver {
    async fn resolve(&self) -> Result<PublicIp> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Some(ip) => Ok(PublicIp::new(ip.clone())),
            None => Err(Error::resolve("simulated echo service outage")),
        }
    }
}

/// What the mock provider's lookup should report
#[derive(Clone)]
enum LookupScript {
    /// Lookup succeeds with no record
    NotFound,
    /// Lookup succeeds with this record
    Found(DnsRecord),
    /// Lookup fails (transport/auth)
    Fails,
}

/// A provider that scripts lookup results and records mutation calls
#[derive(Clone)]
pub struct ScriptedProvider {
    lookup: LookupScript,
    /// When true, create/update calls fail
    fail_mutations: bool,
    /// Call counter for find_record()
    lookup_calls: Arc<AtomicUsize>,
    /// Recorded (name, ip) pairs from create calls
    creates: Arc<std::sync::Mutex<Vec<(String, String)>>>,
    /// Recorded (record_id, name, ip) triples from update calls
    updates: Arc<std::sync::Mutex<Vec<(String, String, String)>>>,
}

impl ScriptedProvider {
    fn with_lookup(lookup: LookupScript) -> Self {
        Self {
            lookup,
            fail_mutations: false,
            lookup_calls: Arc::new(AtomicUsize::new(0)),
            creates: Arc::new(std::sync::Mutex::new(Vec::new())),
            updates: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// A provider whose lookup finds no record
    pub fn without_record() -> Self {
        Self::with_lookup(LookupScript::NotFound)
    }

    /// A provider whose lookup finds the given record
    pub fn with_record(record: DnsRecord) -> Self {
        Self::with_lookup(LookupScript::Found(record))
    }

    /// A provider whose lookup fails
    pub fn with_failing_lookup() -> Self {
        Self::with_lookup(LookupScript::Fails)
    }

    /// Make create/update calls fail
    pub fn failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    /// Number of times find_record() was called
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    /// Recorded (name, ip) pairs from create calls
    pub fn creates(&self) -> Vec<(String, String)> {
        self.creates.lock().unwrap().clone()
    }

    /// Recorded (record_id, name, ip) triples from update calls
    pub fn updates(&self) -> Vec<(String, String, String)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for ScriptedProvider {
    async fn find_record(&self, _name: &str) -> Result<Option<DnsRecord>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        match &self.lookup {
            LookupScript::NotFound => Ok(None),
            LookupScript::Found(record) => Ok(Some(record.clone())),
            LookupScript::Fails => Err(Error::lookup("simulated provider outage")),
        }
    }

    async fn create_record(&self, name: &str, ip: &PublicIp) -> Result<DnsRecord> {
        if self.fail_mutations {
            return Err(Error::mutation("simulated create failure"));
        }
        self.creates
            .lock()
            .unwrap()
            .push((name.to_string(), ip.as_str().to_string()));
        Ok(a_record("created-id", name, ip.as_str()))
    }

    async fn update_record(&self, record_id: &str, name: &str, ip: &PublicIp) -> Result<DnsRecord> {
        if self.fail_mutations {
            return Err(Error::mutation("simulated update failure"));
        }
        self.updates.lock().unwrap().push((
            record_id.to_string(),
            name.to_string(),
            ip.as_str().to_string(),
        ));
        Ok(a_record(record_id, name, ip.as_str()))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Helper to build an "A" record with the system's fixed TTL and proxy policy
pub fn a_record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: "A".to_string(),
        content: content.to_string(),
        ttl: 120,
        proxied: false,
    }
}

/// Helper to create a minimal SyncConfig for testing
///
/// The interval is long enough that only the immediate first tick can
/// fire within a test's run window.
pub fn minimal_config(record_name: &str) -> zonesync_core::config::SyncConfig {
    zonesync_core::config::SyncConfig {
        provider: zonesync_core::config::ProviderConfig::Cloudflare {
            api_token: "test-token".to_string(),
            zone_id: "test-zone".to_string(),
        },
        resolver: zonesync_core::config::ResolverConfig::default(),
        record: zonesync_core::config::RecordConfig::new(record_name),
        engine: zonesync_core::config::EngineConfig {
            interval_secs: 3600,
            event_channel_capacity: 16,
        },
    }
}
