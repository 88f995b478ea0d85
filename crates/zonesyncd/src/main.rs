// # zonesyncd - reconciliation daemon
//
// Thin integration layer: reads configuration from environment
// variables, initializes the runtime and tracing, wires the resolver
// and provider into the engine, and runs it until terminated. All
// reconciliation logic lives in zonesync-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Required
// - `ZONESYNC_API_TOKEN`: Cloudflare API token (Zone:DNS:Edit)
// - `ZONESYNC_ZONE_ID`: Zone the record lives in
// - `ZONESYNC_RECORD_NAME`: Hostname to keep synchronized
//
// ### Optional
// - `ZONESYNC_IP_URL`: Public-IP echo endpoint (default: api64.ipify.org)
// - `ZONESYNC_INTERVAL_SECS`: Seconds between ticks (default: 300)
// - `ZONESYNC_LOG_LEVEL`: trace|debug|info|warn|error (default: info)
//
// ## Example
//
// ```bash
// export ZONESYNC_API_TOKEN=your_token
// export ZONESYNC_ZONE_ID=your_zone_id
// export ZONESYNC_RECORD_NAME=home.example.com
//
// zonesyncd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::{Reconciler, ReconcilerEvent, TickOutcome};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    api_token: String,
    zone_id: String,
    record_name: String,
    ip_url: Option<String>,
    interval_secs: Option<u64>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_token: env::var("ZONESYNC_API_TOKEN")
                .map_err(|_| anyhow::anyhow!("ZONESYNC_API_TOKEN is required"))?,
            zone_id: env::var("ZONESYNC_ZONE_ID")
                .map_err(|_| anyhow::anyhow!("ZONESYNC_ZONE_ID is required"))?,
            record_name: env::var("ZONESYNC_RECORD_NAME")
                .map_err(|_| anyhow::anyhow!("ZONESYNC_RECORD_NAME is required"))?,
            ip_url: env::var("ZONESYNC_IP_URL").ok(),
            interval_secs: env::var("ZONESYNC_INTERVAL_SECS")
                .ok()
                .map(|s| {
                    s.parse().map_err(|_| {
                        anyhow::anyhow!("ZONESYNC_INTERVAL_SECS must be an integer, got '{}'", s)
                    })
                })
                .transpose()?,
            log_level: env::var("ZONESYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Catches the failure modes that would otherwise surface as cryptic
    /// HTTP errors on the first tick: empty or placeholder credentials,
    /// malformed hostnames, and out-of-range intervals.
    fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            anyhow::bail!(
                "ZONESYNC_API_TOKEN is empty. \
                Set it via: export ZONESYNC_API_TOKEN=your_token"
            );
        }

        // Check for obvious placeholder tokens (common mistake)
        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower.contains("example")
            || token_lower == "token"
        {
            anyhow::bail!(
                "ZONESYNC_API_TOKEN appears to be a placeholder. \
                Use an actual API token from your DNS provider."
            );
        }

        if self.zone_id.is_empty() {
            anyhow::bail!("ZONESYNC_ZONE_ID is empty");
        }

        validate_domain_name(&self.record_name)?;

        if let Some(ref url) = self.ip_url
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            anyhow::bail!(
                "ZONESYNC_IP_URL must use HTTP or HTTPS scheme. Got: {}",
                url
            );
        }

        if let Some(interval) = self.interval_secs
            && !(10..=86400).contains(&interval)
        {
            anyhow::bail!(
                "ZONESYNC_INTERVAL_SECS must be between 10 and 86400 seconds. Got: {}",
                interval
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "ZONESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Build the engine configuration from the validated environment
    fn to_sync_config(&self) -> zonesync_core::SyncConfig {
        let mut engine = zonesync_core::EngineConfig::default();
        if let Some(interval) = self.interval_secs {
            engine.interval_secs = interval;
        }

        zonesync_core::SyncConfig {
            provider: zonesync_core::ProviderConfig::Cloudflare {
                api_token: self.api_token.clone(),
                zone_id: self.zone_id.clone(),
            },
            resolver: match self.ip_url {
                Some(ref url) => zonesync_core::ResolverConfig::Http { url: url.clone() },
                None => zonesync_core::ResolverConfig::default(),
            },
            record: zonesync_core::RecordConfig::new(self.record_name.clone()),
            engine,
        }
    }
}

/// Validate that a string is a valid domain name
///
/// Basic DNS domain name validation per RFC 1035. Not comprehensive,
/// but catches common errors before the first API call.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        anyhow::bail!("ZONESYNC_RECORD_NAME cannot be empty");
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting zonesyncd");
    info!("Managing record: {}", config.record_name);

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire up components and run the engine until shutdown
async fn run_daemon(config: Config) -> Result<()> {
    let sync_config = config.to_sync_config();

    let resolver = zonesync_ip_ipify::IpifyResolver::from_config(&sync_config.resolver)?;
    let provider =
        zonesync_provider_cloudflare::CloudflareProvider::from_config(&sync_config.provider)?;

    info!("Public IP resolver ready");
    info!("DNS provider: cloudflare, zone {}", config.zone_id);

    let (engine, mut events) =
        Reconciler::new(Box::new(resolver), Box::new(provider), sync_config)?;

    // Surface tick outcomes as operator-facing status lines
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            log_event(event);
        }
    });

    engine.run().await?;

    Ok(())
}

/// One status line per engine event, each outcome category distinguishable
fn log_event(event: ReconcilerEvent) {
    match event {
        ReconcilerEvent::Started { record_name } => {
            info!("Reconciliation started for {}", record_name);
        }
        ReconcilerEvent::TickCompleted(outcome) => match outcome {
            TickOutcome::Unchanged { current } => {
                info!("No change needed (IP {})", current);
            }
            TickOutcome::Created { record_id, new_ip } => {
                info!("Record created ({}) with IP {}", record_id, new_ip);
            }
            TickOutcome::Updated {
                record_id,
                previous,
                new_ip,
            } => {
                info!(
                    "Record {} updated: {} -> {}",
                    record_id, previous, new_ip
                );
            }
            TickOutcome::ResolveFailed { error } => {
                warn!("Could not resolve public IP: {}", error);
            }
            TickOutcome::LookupFailed { error } => {
                warn!("Could not look up record: {}", error);
            }
            TickOutcome::MutationFailed { error } => {
                warn!("Could not write record: {}", error);
            }
        },
        ReconcilerEvent::Stopped { reason } => {
            info!("Reconciliation stopped: {}", reason);
        }
    }
}
