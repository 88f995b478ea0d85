//! Configuration types for the reconciliation engine
//!
//! The configuration is constructed once at startup and passed by value
//! into the [`Reconciler`](crate::Reconciler); there is no global mutable
//! configuration. Validation happens before the first network call so a
//! missing credential is an explicit startup error rather than a cryptic
//! downstream HTTP failure.

use serde::{Deserialize, Serialize};

/// Default public-IP echo endpoint
pub const DEFAULT_IP_ENDPOINT: &str = "https://api64.ipify.org";

/// Main zonesync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Public-IP resolver configuration
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// The record to keep synchronized
    pub record: RecordConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.resolver.validate()?;

        if self.record.name.is_empty() {
            return Err(crate::Error::config("Record name cannot be empty"));
        }

        if self.engine.interval_secs == 0 {
            return Err(crate::Error::config("Reconcile interval must be > 0"));
        }

        Ok(())
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider
    Cloudflare {
        /// Cloudflare API token
        api_token: String,
        /// Zone ID the record lives in
        zone_id: String,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare { api_token, zone_id } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Cloudflare API token cannot be empty"));
                }
                if zone_id.is_empty() {
                    return Err(crate::Error::config("Cloudflare zone ID cannot be empty"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
        }
    }
}

/// Public-IP resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolverConfig {
    /// HTTP-based resolver (ipify-style JSON echo service)
    Http {
        /// URL of the echo service
        url: String,
    },
}

impl ResolverConfig {
    /// Validate the resolver configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ResolverConfig::Http { url } => {
                if url.is_empty() {
                    return Err(crate::Error::config("Resolver URL cannot be empty"));
                }
                if !url.starts_with("https://") && !url.starts_with("http://") {
                    return Err(crate::Error::config(
                        "Resolver URL must use HTTP or HTTPS scheme",
                    ));
                }
                Ok(())
            }
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig::Http {
            url: DEFAULT_IP_ENDPOINT.to_string(),
        }
    }
}

/// Configuration for the managed DNS record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// DNS record name (e.g., "home.example.com")
    pub name: String,
}

impl RecordConfig {
    /// Create a new record configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Interval between reconciliation ticks (in seconds)
    ///
    /// The first tick runs immediately at startup; subsequent ticks fire
    /// on this interval. A failed tick waits for the next scheduled tick,
    /// with no backoff and no retry cap.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Capacity of the internal event channel
    ///
    /// When full, new engine events are dropped (with a warning log) so
    /// a slow consumer cannot grow memory without bound.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_interval_secs() -> u64 {
    300
}

fn default_event_channel_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SyncConfig {
        SyncConfig {
            provider: ProviderConfig::Cloudflare {
                api_token: "test-token".to_string(),
                zone_id: "test-zone".to_string(),
            },
            resolver: ResolverConfig::default(),
            record: RecordConfig::new("home.example.com"),
            engine: EngineConfig::default(),
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn empty_api_token_is_rejected() {
        let mut config = valid_config();
        config.provider = ProviderConfig::Cloudflare {
            api_token: String::new(),
            zone_id: "test-zone".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_zone_id_is_rejected() {
        let mut config = valid_config();
        config.provider = ProviderConfig::Cloudflare {
            api_token: "test-token".to_string(),
            zone_id: String::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_record_name_is_rejected() {
        let mut config = valid_config();
        config.record.name.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = valid_config();
        config.engine.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolver_defaults_to_ipify() {
        match ResolverConfig::default() {
            ResolverConfig::Http { url } => assert_eq!(url, DEFAULT_IP_ENDPOINT),
        }
    }

    #[test]
    fn engine_defaults_match_documented_schedule() {
        let engine = EngineConfig::default();
        assert_eq!(engine.interval_secs, 300);
    }
}
