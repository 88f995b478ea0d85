// # DNS Provider Trait
//
// Defines the interface for reading and mutating the managed record via
// the provider's zone API.
//
// ## Implementations
//
// - Cloudflare: `zonesync-provider-cloudflare` crate
// - Future: Route53, DigitalOcean, deSEC, etc.
//
// ## Responsibility boundary
//
// Providers are stateless, single-shot API adapters. The decision of
// whether a record needs creating or updating is owned by the
// [`Reconciler`](crate::Reconciler); providers only execute the
// operation they are asked to perform and report success or failure.
// They must not retry, back off, cache, or spawn tasks — a returned
// error is handled by the engine's tick discipline.

use async_trait::async_trait;

use super::ip_resolver::PublicIp;

/// The provider's view of a name-to-address mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Opaque provider-assigned record identifier, required to mutate later
    pub id: String,
    /// The record name (hostname)
    pub name: String,
    /// The record type ("A" for this system's purposes)
    pub record_type: String,
    /// Current content — an IPv4 address string
    pub content: String,
    /// Time-to-live in seconds (informational)
    pub ttl: u32,
    /// Whether traffic is routed through the provider's reverse proxy
    pub proxied: bool,
}

impl DnsRecord {
    /// Whether this record already carries the given address
    pub fn matches(&self, ip: &PublicIp) -> bool {
        self.content == ip.as_str()
    }
}

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Error discipline
///
/// `find_record` must distinguish "no record exists" (`Ok(None)`, a
/// valid expected state) from "the request failed" (`Err`). Conflating
/// them would cause spurious record creation on transient failures.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the record for a hostname
    ///
    /// Queries the provider's list-records endpoint filtered by exact
    /// name. If multiple records match, the first element is returned —
    /// an ordering the provider controls, preserved as documented
    /// behavior.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(DnsRecord))`: The first matching record
    /// - `Ok(None)`: The request succeeded and no record exists yet
    /// - `Err(Error)`: Transport failure, auth failure, or body-level
    ///   failure — never reported as `Ok(None)`
    async fn find_record(&self, name: &str) -> Result<Option<DnsRecord>, crate::Error>;

    /// Create an "A" record mapping `name` to `ip`
    ///
    /// Used only when [`find_record`](Self::find_record) returned
    /// `Ok(None)`. TTL and proxying are fixed policy choices of the
    /// implementation, not inputs.
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecord)`: The record as created by the provider
    /// - `Err(Error)`: Network error, non-2xx response, or body-level
    ///   failure indicator
    async fn create_record(&self, name: &str, ip: &PublicIp) -> Result<DnsRecord, crate::Error>;

    /// Update the record addressed by `record_id` to carry `ip`
    ///
    /// Used only when an existing record's content differs from the
    /// newly resolved address.
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecord)`: The record as updated by the provider
    /// - `Err(Error)`: Network error, non-2xx response, or body-level
    ///   failure indicator
    async fn update_record(
        &self,
        record_id: &str,
        name: &str,
        ip: &PublicIp,
    ) -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
