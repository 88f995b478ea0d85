// # Public IP Resolver Trait
//
// Defines the interface for fetching the machine's current public IPv4
// address from an external echo service.
//
// ## Implementations
//
// - ipify-style JSON echo: `zonesync-ip-ipify` crate
// - Future: plain-text echo services, router/UPnP queries

use async_trait::async_trait;
use std::fmt;

/// The caller's current public IPv4 address as reported by the echo
/// service.
///
/// The value is carried verbatim — no IPv4 syntax validation is
/// performed. Comparison against the provider record's content is plain
/// string equality, so whatever the echo service returns is what gets
/// written to the zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicIp(String);

impl PublicIp {
    /// Wrap a raw address string
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// The raw address string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for public-IP resolver implementations
///
/// Implementations issue a single request per call, carry no state, and
/// must be thread-safe. Retry and scheduling discipline is owned by the
/// [`Reconciler`](crate::Reconciler): a resolver failure aborts the
/// current tick and the engine simply tries again on the next one, so
/// implementations must not loop or sleep internally.
#[async_trait]
pub trait PublicIpResolver: Send + Sync {
    /// Fetch the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(PublicIp)`: The address reported by the echo service
    /// - `Err(Error)`: Transport error, non-2xx response, or malformed
    ///   body. The caller treats this as "public IP currently unknown"
    ///   and skips the rest of the tick — a stale or default value must
    ///   never be propagated.
    async fn resolve(&self) -> Result<PublicIp, crate::Error>;
}
