// # ipify HTTP Public-IP Resolver
//
// Queries an ipify-style echo service for the caller's public IPv4
// address. The service returns a JSON body of the shape
// `{"ip": "<ipv4>"}` when asked with `?format=json`.
//
// ## Behavior
//
// - One GET per resolve() call; no caching, no retries (the engine owns
//   the schedule and simply tries again next tick)
// - The `ip` field is returned verbatim — no IPv4 syntax validation;
//   the echo service's answer is trusted as-is
// - Transport errors, non-2xx responses, and malformed bodies all
//   surface as resolve failures

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use zonesync_core::config::{DEFAULT_IP_ENDPOINT, ResolverConfig};
use zonesync_core::traits::{PublicIp, PublicIpResolver};
use zonesync_core::{Error, Result};

/// HTTP timeout for echo-service requests
///
/// The echo service answers in well under a second when healthy; a
/// bounded timeout keeps a wedged connection from blocking the tick
/// until the next interval.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON body returned by the echo service
#[derive(Debug, Deserialize)]
struct IpEcho {
    ip: String,
}

/// ipify-style public-IP resolver
#[derive(Debug, Clone)]
pub struct IpifyResolver {
    /// Echo service endpoint (without the `format` query parameter)
    url: String,

    /// HTTP client for echo requests
    client: reqwest::Client,
}

impl IpifyResolver {
    /// Create a resolver against the given echo endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a resolver against the default ipify endpoint
    pub fn default_endpoint() -> Self {
        Self::new(DEFAULT_IP_ENDPOINT)
    }

    /// Create a resolver from configuration
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        config.validate()?;
        match config {
            ResolverConfig::Http { url } => Ok(Self::new(url.clone())),
        }
    }
}

#[async_trait]
impl PublicIpResolver for IpifyResolver {
    async fn resolve(&self) -> Result<PublicIp> {
        let url = format!("{}?format=json", self.url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::resolve(format!("echo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::resolve(format!(
                "echo service returned HTTP {}",
                response.status()
            )));
        }

        let body: IpEcho = response
            .json()
            .await
            .map_err(|e| Error::resolve(format!("malformed echo response: {}", e)))?;

        tracing::debug!("Echo service reports public IP {}", body.ip);
        Ok(PublicIp::new(body.ip))
    }
}
